//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain values before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{movies, roles, users, users_roles};

/// Row struct for reading from the roles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: Uuid,
    pub name: String,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Insertable struct for creating accounts. Timestamps default in SQL.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
}

/// Insertable struct for account role links.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users_roles)]
pub(crate) struct NewUserRoleRow {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

/// Row struct for reading from the movies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MovieRow {
    pub id: Uuid,
    pub title: String,
    pub director: String,
    pub release_date: String,
    pub opening: Option<String>,
    pub producer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating movies.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub(crate) struct NewMovieRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub director: &'a str,
    pub release_date: &'a str,
    pub opening: Option<&'a str>,
    pub producer: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset overwriting every mutable catalog column.
///
/// `None` clears the nullable columns rather than skipping them, so a feed
/// that drops a producer credit also drops it from the store.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = movies)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MovieUpdate<'a> {
    pub title: &'a str,
    pub director: &'a str,
    pub release_date: &'a str,
    pub opening: Option<&'a str>,
    pub producer: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
