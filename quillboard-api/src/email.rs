/// Outbound email for the password-reset flow
///
/// The mailer sends the reset link generated by `forgotPassword`. Transport
/// is chosen by configuration: an SMTP relay when `SMTP_HOST` is set,
/// otherwise lettre's file transport writing `.eml` files into a local
/// directory so the flow works in development without infrastructure.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::path::Path;
use thiserror::Error;

use crate::config::EmailConfig;

/// Mailer errors
#[derive(Error, Debug)]
pub enum MailerError {
    /// A mailbox string could not be parsed
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be built
    #[error("failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),

    /// SMTP transport failure
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// File transport failure
    #[error("file transport error: {0}")]
    File(#[from] lettre::transport::file::Error),

    /// Could not prepare the file transport directory
    #[error("failed to create email output directory: {0}")]
    Io(#[from] std::io::Error),
}

enum MailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

/// Sends password-reset emails
pub struct Mailer {
    transport: MailTransport,
    from: Mailbox,
    frontend_url: String,
}

impl Mailer {
    /// Creates a mailer from the email configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the sender mailbox is malformed, the SMTP relay
    /// cannot be configured, or the file transport directory cannot be
    /// created.
    pub fn new(config: &EmailConfig) -> Result<Self, MailerError> {
        let from: Mailbox = config.from.parse()?;

        let transport = match &config.smtp {
            Some(smtp) => {
                let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
                    .port(smtp.port)
                    .credentials(Credentials::new(
                        smtp.username.clone(),
                        smtp.password.clone(),
                    ));
                MailTransport::Smtp(builder.build())
            }
            None => {
                // Development mode: write .eml files instead of sending
                let dir = Path::new(&config.file_dir);
                if !dir.exists() {
                    std::fs::create_dir_all(dir)?;
                }
                tracing::info!(
                    dir = %config.file_dir,
                    "SMTP not configured, emails will be written to disk"
                );
                MailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(dir))
            }
        };

        Ok(Self {
            transport,
            from,
            frontend_url: config.frontend_url.clone(),
        })
    }

    /// Sends the password-reset email containing the change-password link
    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailerError> {
        let link = reset_link(&self.frontend_url, token);
        let body = format!(r#"<a href="{}">reset password</a>"#, link);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject("Change password")
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        match &self.transport {
            MailTransport::Smtp(transport) => {
                transport.send(message).await?;
            }
            MailTransport::File(transport) => {
                transport.send(message).await?;
            }
        }

        tracing::info!(%to, "Password reset email sent");
        Ok(())
    }
}

/// Builds the frontend change-password link for a token
fn reset_link(frontend_url: &str, token: &str) -> String {
    format!("{}/change-password/{}", frontend_url, token)
}
