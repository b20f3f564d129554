//! # Quillboard Web
//!
//! Server-rendered frontend for Quillboard. Pages are Askama templates;
//! every form post becomes a GraphQL operation against the API server,
//! with the browser's session cookie forwarded both ways.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod routes;
