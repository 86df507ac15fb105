//! Port abstraction for credential persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, NewUser, Role, RoleName, User, UserCredentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique constraint rejected the write; `key` describes the clash.
        Duplicate { key: String } => "user already exists: {key}",
    }
}

/// Credential store for accounts and role reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and its role links atomically.
    ///
    /// A clashing email must surface as [`UserPersistenceError::Duplicate`].
    async fn insert(&self, user: &NewUser) -> Result<(), UserPersistenceError>;

    /// Fetch an account and its password digest by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Fetch an account with its roles by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Resolve a persisted role by name.
    async fn find_role_by_name(&self, name: RoleName)
    -> Result<Option<Role>, UserPersistenceError>;
}
