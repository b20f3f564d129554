/// Frontend configuration loaded from environment variables
///
/// # Environment Variables
///
/// - `WEB_HOST` - Bind address (default: 127.0.0.1)
/// - `WEB_PORT` - Bind port (default: 3000)
/// - `API_URL` - GraphQL endpoint of the API server
///   (default: http://localhost:4000/graphql)

use std::env;

/// Frontend server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// GraphQL endpoint of the API server
    pub api_url: String,
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("WEB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("WEB_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("WEB_PORT must be a valid port number"))?;

        let api_url = env::var("API_URL")
            .unwrap_or_else(|_| "http://localhost:4000/graphql".to_string());

        Ok(Self {
            host,
            port,
            api_url,
        })
    }

    /// Returns the socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
