//! In-memory credential store.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, Role, RoleName, User, UserCredentials, UserId,
};

#[derive(Debug, Default)]
struct UserState {
    roles: Vec<Role>,
    accounts: Vec<UserCredentials>,
}

/// Credential store seeded with the `admin` and `user` roles.
///
/// Email uniqueness is enforced on insert the same way the database
/// constraint does it, so duplicate handling can be exercised end to end.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: Mutex<UserState>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::with_roles([RoleName::Admin, RoleName::User])
    }
}

impl InMemoryUserRepository {
    /// Store seeded with exactly `roles`.
    pub fn with_roles(roles: impl IntoIterator<Item = RoleName>) -> Self {
        let roles = roles
            .into_iter()
            .map(|name| Role::new(Uuid::new_v4(), name))
            .collect();
        Self {
            state: Mutex::new(UserState {
                roles,
                accounts: Vec::new(),
            }),
        }
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.lock().accounts.len()
    }

    /// Whether no account has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the role set held by `id`, simulating an out-of-band change.
    pub fn set_roles(&self, id: &UserId, roles: &[RoleName]) {
        let mut state = self.lock();
        if let Some(record) = state.accounts.iter_mut().find(|r| r.user.id() == id) {
            record.user = User::new(
                record.user.id().clone(),
                record.user.email().clone(),
                record.user.full_name().clone(),
                roles.iter().copied(),
            );
        }
    }

    /// Drop the account with `id`.
    pub fn remove(&self, id: &UserId) {
        self.lock().accounts.retain(|record| record.user.id() != id);
    }

    fn lock(&self) -> MutexGuard<'_, UserState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state
            .accounts
            .iter()
            .any(|record| record.user.email() == &user.email)
        {
            return Err(UserPersistenceError::duplicate(format!(
                "Key (email)=({}) already exists.",
                user.email
            )));
        }
        state.accounts.push(UserCredentials {
            user: User::new(
                user.id.clone(),
                user.email.clone(),
                user.full_name.clone(),
                user.roles.iter().map(Role::name),
            ),
            digest: user.digest.clone(),
        });
        Ok(())
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .find(|record| record.user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .find(|record| record.user.id() == id)
            .map(|record| record.user.clone()))
    }

    async fn find_role_by_name(
        &self,
        name: RoleName,
    ) -> Result<Option<Role>, UserPersistenceError> {
        Ok(self
            .lock()
            .roles
            .iter()
            .find(|role| role.name() == name)
            .cloned())
    }
}
