//! Shared Diesel error mapping for the catalog and account repositories.
//!
//! Both repositories expose the same three failure shapes (connection, query
//! and duplicate key), so the mapping is written once against constructor
//! closures.

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constructors for a repository's port error.
pub(crate) struct ErrorConstructors<E> {
    pub connection: fn(String) -> E,
    pub query: fn(String) -> E,
    pub duplicate: fn(String) -> E,
}

/// Map pool errors into the repository's connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, ctors: &ErrorConstructors<E>) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    (ctors.connection)(message)
}

/// Map Diesel errors into connection, duplicate or query errors.
///
/// Unique violations keep the server's description of the clashing key so
/// callers can report which natural key or email was taken.
pub(crate) fn map_diesel_error<E>(error: DieselError, ctors: &ErrorConstructors<E>) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            (ctors.duplicate)(duplicate_key(info.as_ref()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (ctors.connection)("database connection error".to_owned())
        }
        DieselError::NotFound => (ctors.query)("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => (ctors.query)("database query error".to_owned()),
        _ => (ctors.query)("database error".to_owned()),
    }
}

fn duplicate_key(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> String {
    info.details()
        .map(str::to_owned)
        .or_else(|| info.constraint_name().map(str::to_owned))
        .unwrap_or_else(|| info.message().to_owned())
}
