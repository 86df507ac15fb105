//! Driving ports for the identity use-cases.
//!
//! Inbound adapters call these to register accounts and authenticate
//! credentials without importing the backing infrastructure, so handler tests
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, LoginOutcome, Registration, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown emails and wrong passwords fail with the same
    /// [`crate::domain::ErrorCode::Unauthorized`] error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}

/// Domain use-case port for account registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account with the requested roles. No token is issued.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
