//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`users`] -- The directory of accounts allowed to log in.

pub mod jwt;
pub mod password;
pub mod users;
