//! Identity domain service: registration and login.
//!
//! Duplicate emails are detected from the store's unique constraint after the
//! insert is attempted; there is no read-then-write pre-check. Password work
//! runs on the blocking pool so request workers stay responsive. Logins for
//! unknown emails still pay for one verification against a decoy digest, so
//! response time does not reveal which emails are registered.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHasher, RegistrationService, TokenService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Email, Error, LoginCredentials, LoginOutcome, NewUser, PasswordDigest, Registration, Role,
    RoleName, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const DECOY_PASSWORD: &str = "holocron-decoy-password";

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS)
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { key } => {
            Error::conflict(format!("user already exists: {key}"))
        }
    }
}

/// Identity service implementing the login and registration driving ports.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    decoy_digest: Arc<OnceCell<PasswordDigest>>,
}

impl IdentityService {
    /// Create the service from its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy_digest: Arc::new(OnceCell::new()),
        }
    }

    async fn resolve_roles(&self, names: &BTreeSet<RoleName>) -> Result<Vec<Role>, Error> {
        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            let role = self
                .users
                .find_role_by_name(*name)
                .await
                .map_err(map_user_error)?
                .ok_or_else(|| {
                    warn!(role = %name, "requested role is not seeded");
                    Error::invalid_request(format!("invalid role: {name}"))
                })?;
            roles.push(role);
        }
        Ok(roles)
    }

    async fn hash_password(&self, password: Zeroizing<String>) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }

    /// Spend one verification on `password` when no account matched.
    async fn verify_against_decoy(&self, password: Zeroizing<String>) {
        let decoy = self
            .decoy_digest
            .get_or_try_init(|| self.hash_password(Zeroizing::new(DECOY_PASSWORD.to_owned())))
            .await;
        match decoy {
            Ok(digest) => {
                if let Err(err) = self.verify_password(password, digest.clone()).await {
                    warn!(error = %err, "decoy password verification failed");
                }
            }
            Err(err) => warn!(error = %err, "decoy password digest unavailable"),
        }
    }

    async fn verify_password(
        &self,
        password: Zeroizing<String>,
        digest: PasswordDigest,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &digest))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
    }
}

#[async_trait]
impl RegistrationService for IdentityService {
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let roles = self.resolve_roles(registration.roles()).await?;
        let digest = self.hash_password(registration.password().clone()).await?;

        let new_user = NewUser {
            id: UserId::random(),
            email: registration.email().clone(),
            full_name: registration.full_name().clone(),
            digest,
            roles,
        };
        self.users
            .insert(&new_user)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %new_user.id, "registered user");
        let NewUser {
            id,
            email,
            full_name,
            roles,
            ..
        } = new_user;
        Ok(User::new(
            id,
            email,
            full_name,
            roles.iter().map(Role::name),
        ))
    }
}

#[async_trait]
impl LoginService for IdentityService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        // A malformed address cannot belong to an account; fail like one.
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(invalid_credentials());
        };
        let password = Zeroizing::new(credentials.password().to_owned());
        let Some(record) = self
            .users
            .find_credentials_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            self.verify_against_decoy(password).await;
            return Err(invalid_credentials());
        };

        if !self.verify_password(password, record.digest).await? {
            return Err(invalid_credentials());
        }

        let token = self
            .tokens
            .issue(record.user.id())
            .map_err(|err| Error::internal(err.to_string()))?;
        info!(user_id = %record.user.id(), "user logged in");
        Ok(LoginOutcome {
            user: record.user,
            token,
        })
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
