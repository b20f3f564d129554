//! # Quillboard Shared Library
//!
//! This crate contains shared types, utilities, and persistence logic used across
//! the Quillboard API server and the server-rendered web frontend.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing utilities
//! - `db`: PostgreSQL pool and migration runner
//! - `redis`: Redis client, session store, and password-reset token store

pub mod auth;
pub mod db;
pub mod models;
pub mod redis;

/// Current version of the Quillboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
