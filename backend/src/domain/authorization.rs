//! Role-based authorization guard.
//!
//! Each guarded operation declares a [`RoleRequirement`]; the guard resolves
//! the caller's current roles and allows the call when they intersect the
//! requirement. An empty requirement allows everyone without a lookup.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{Authorizer, UserPersistenceError, UserRepository};
use crate::domain::{Error, RoleName, UserId};

/// Minimum role-set declared by a guarded operation.
///
/// # Examples
/// ```
/// use holocron::domain::{RoleName, RoleRequirement};
///
/// const MANAGE_CATALOG: RoleRequirement = RoleRequirement::any_of(&[RoleName::Admin]);
/// assert!(!MANAGE_CATALOG.is_unrestricted());
/// assert!(RoleRequirement::none().is_unrestricted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    any_of: &'static [RoleName],
}

impl RoleRequirement {
    /// Requirement that admits every caller.
    pub const fn none() -> Self {
        Self { any_of: &[] }
    }

    /// Requirement satisfied by holding at least one of `roles`.
    pub const fn any_of(roles: &'static [RoleName]) -> Self {
        Self { any_of: roles }
    }

    /// Whether the requirement admits every caller.
    pub const fn is_unrestricted(&self) -> bool {
        self.any_of.is_empty()
    }

    /// Whether `held` intersects the requirement.
    pub fn admits(&self, held: &BTreeSet<RoleName>) -> bool {
        self.is_unrestricted() || self.any_of.iter().any(|role| held.contains(role))
    }

    /// Declared role names.
    pub fn roles(&self) -> &'static [RoleName] {
        self.any_of
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller may proceed.
    Allow,
    /// The caller is authenticated but lacks a required role.
    Deny,
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

/// Guard resolving caller roles from the credential store.
#[derive(Clone)]
pub struct AuthorizationGuard {
    users: Arc<dyn UserRepository>,
}

impl AuthorizationGuard {
    /// Create a guard backed by `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Authorizer for AuthorizationGuard {
    async fn authorize(
        &self,
        subject: Option<&UserId>,
        requirement: &RoleRequirement,
    ) -> Result<AccessDecision, Error> {
        if requirement.is_unrestricted() {
            return Ok(AccessDecision::Allow);
        }
        let Some(subject) = subject else {
            error!("authorization guard invoked without an authenticated principal");
            return Err(Error::internal("missing principal"));
        };

        let Some(user) = self
            .users
            .find_by_id(subject)
            .await
            .map_err(map_user_error)?
        else {
            debug!(user_id = %subject, "token subject no longer resolves to a user");
            return Err(Error::unauthorized("invalid or expired token"));
        };

        if requirement.admits(user.roles()) {
            Ok(AccessDecision::Allow)
        } else {
            debug!(user_id = %subject, "caller lacks a required role");
            Ok(AccessDecision::Deny)
        }
    }
}
