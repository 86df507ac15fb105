//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Accounts and their role links are written in one transaction so a
//! registration never leaves a user without roles.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, FullName, NewUser, PasswordDigest, Role, RoleName, User, UserCredentials, UserId,
};

use super::diesel_error_mapping::{ErrorConstructors, map_diesel_error, map_pool_error};
use super::models::{NewUserRoleRow, NewUserRow, RoleRow, UserRow};
use super::pool::DbPool;
use super::schema::{roles, users, users_roles};

const USER_ERRORS: ErrorConstructors<UserPersistenceError> = ErrorConstructors {
    connection: UserPersistenceError::connection,
    query: UserPersistenceError::query,
    duplicate: UserPersistenceError::duplicate,
};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, &USER_ERRORS)
}

/// Load the role names linked to `user_id`, skipping names this build does
/// not understand.
async fn load_role_names<C>(
    conn: &mut C,
    user_id: Uuid,
) -> Result<Vec<RoleName>, UserPersistenceError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let names: Vec<String> = users_roles::table
        .inner_join(roles::table)
        .filter(users_roles::user_id.eq(user_id))
        .select(roles::name)
        .load(conn)
        .await
        .map_err(diesel_error)?;

    Ok(names
        .into_iter()
        .filter_map(|name| match name.parse::<RoleName>() {
            Ok(role) => Some(role),
            Err(_) => {
                warn!(%user_id, role = %name, "skipping unrecognised role");
                None
            }
        })
        .collect())
}

fn row_to_user(row: &UserRow, roles: Vec<RoleName>) -> Result<User, UserPersistenceError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let full_name = FullName::new(&row.full_name)
        .map_err(|err| UserPersistenceError::query(format!("stored full name invalid: {err}")))?;
    Ok(User::new(UserId::from(row.id), email, full_name, roles))
}

fn row_to_role(row: RoleRow) -> Result<Role, UserPersistenceError> {
    let name = row
        .name
        .parse::<RoleName>()
        .map_err(|err| UserPersistenceError::query(format!("stored role name invalid: {err}")))?;
    Ok(Role::new(row.id, name))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &USER_ERRORS))?;

        let user_id = *user.id.as_uuid();
        let new_row = NewUserRow {
            id: user_id,
            email: user.email.as_ref(),
            full_name: user.full_name.as_ref(),
            password_hash: user.digest.as_str(),
        };
        let links: Vec<NewUserRoleRow> = user
            .roles
            .iter()
            .map(|role| NewUserRoleRow {
                user_id,
                role_id: role.id(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;

                if !links.is_empty() {
                    diesel::insert_into(users_roles::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &USER_ERRORS))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let roles = load_role_names(&mut conn, row.id).await?;
        let user = row_to_user(&row, roles)?;
        Ok(Some(UserCredentials {
            user,
            digest: PasswordDigest::new(row.password_hash),
        }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &USER_ERRORS))?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(*id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        match row {
            Some(row) => {
                let roles = load_role_names(&mut conn, row.id).await?;
                row_to_user(&row, roles).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn find_role_by_name(
        &self,
        name: RoleName,
    ) -> Result<Option<Role>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &USER_ERRORS))?;

        let row: Option<RoleRow> = roles::table
            .filter(roles::name.eq(name.as_str()))
            .select(RoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_role).transpose()
    }
}
