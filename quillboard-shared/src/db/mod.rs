/// Database layer for Quillboard
///
/// This module provides database connection pooling and migrations.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Database migration runner
///
/// Models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;

// Re-export common types for convenience
pub use migrations::run_migrations;
pub use pool::{create_pool, DatabaseConfig};
