//! Driven port for one-way password hashing.
//!
//! Implementations are CPU bound; async callers should run them on a
//! blocking thread.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing primitive rejected its parameters or input.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, adaptive-cost password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt.
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `plaintext` against `digest` using the parameters embedded in it.
    ///
    /// Malformed digests verify as `false`.
    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool;
}
