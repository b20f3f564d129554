//! # Quillboard API Server Library
//!
//! This library provides the core functionality for the Quillboard API server:
//! a GraphQL endpoint over posts and users with cookie-session authentication.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `email`: Outbound email (password-reset links)
//! - `error`: Error handling and HTTP response mapping
//! - `graphql`: GraphQL schema, types, and resolvers
//! - `session`: Per-request session handle shared with resolvers

pub mod app;
pub mod config;
pub mod email;
pub mod error;
pub mod graphql;
pub mod session;
