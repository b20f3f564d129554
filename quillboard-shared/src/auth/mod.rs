/// Authentication utilities for Quillboard
///
/// # Modules
///
/// - `password`: Argon2id password hashing and verification
///
/// Session state itself lives in Redis; see `crate::redis::sessions`.

pub mod password;
