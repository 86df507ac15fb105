//! Driving port for per-request role checks.

use async_trait::async_trait;

use crate::domain::{AccessDecision, Error, RoleRequirement, UserId};

/// Decides whether a caller may run an operation with a declared requirement.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Evaluate `requirement` for `subject`.
    async fn authorize(
        &self,
        subject: Option<&UserId>,
        requirement: &RoleRequirement,
    ) -> Result<AccessDecision, Error>;

    /// Evaluate `requirement` and turn a denial into a forbidden error.
    async fn enforce(
        &self,
        subject: Option<&UserId>,
        requirement: &RoleRequirement,
    ) -> Result<(), Error> {
        match self.authorize(subject, requirement).await? {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny => Err(Error::forbidden("forbidden")),
        }
    }
}
