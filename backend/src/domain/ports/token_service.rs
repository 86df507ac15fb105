//! Driven port for issuing and validating bearer tokens.

use crate::domain::{IssuedToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signing failed.
        Encode { message: String } => "token encoding failed: {message}",
        /// Signature, expiry or payload check failed.
        Invalid => "invalid or expired token",
    }
}

/// Signed, time-bound tokens carrying a user id as subject.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject` that expires after the configured window.
    fn issue(&self, subject: &UserId) -> Result<IssuedToken, TokenError>;

    /// Verify signature and expiry and return the subject.
    fn validate(&self, token: &str) -> Result<UserId, TokenError>;
}
