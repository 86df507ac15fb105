//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Role reference data seeded by migration.
    roles (id) {
        id -> Uuid,
        /// Lowercase role name (`admin` or `user`).
        name -> Varchar,
    }
}

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Varchar,
        /// PHC-encoded Argon2id hash.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many link between accounts and roles.
    users_roles (user_id, role_id) {
        user_id -> Uuid,
        role_id -> Uuid,
    }
}

diesel::table! {
    /// Catalog entries.
    ///
    /// `(title, director)` carries the `movies_title_director_key` unique
    /// constraint, which spans soft-deleted rows.
    movies (id) {
        id -> Uuid,
        title -> Varchar,
        director -> Varchar,
        release_date -> Varchar,
        opening -> Nullable<Text>,
        producer -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Set when the movie is soft-deleted.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(users_roles -> users (user_id));
diesel::joinable!(users_roles -> roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(roles, users, users_roles, movies);
