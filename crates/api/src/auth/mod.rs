//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation, auth cookie helpers.

pub mod jwt;
pub mod password;
