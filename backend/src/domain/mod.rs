//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for identities and the movie
//! catalog, plus the services that implement the driving ports. Adapters
//! depend on this module; it depends on no adapter.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Registration, LoginCredentials: identity model.
//! - Movie, NaturalKey, MovieDraft, MovieChanges: catalog model.
//! - IdentityService, AuthorizationGuard, CatalogService, MovieSyncService:
//!   domain services behind the driving ports in [`ports`].

pub mod auth;
pub mod authorization;
pub mod catalog_service;
pub mod error;
pub mod identity_service;
pub mod movie;
pub mod movie_sync;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    IssuedToken, LoginCredentials, LoginOutcome, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN,
    Registration, RegistrationValidationError,
};
pub use self::authorization::{AccessDecision, AuthorizationGuard, RoleRequirement};
pub use self::catalog_service::{CatalogService, CatalogSettings, DEFAULT_PAGE_SIZE};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::movie::{
    DeletionScope, MAX_PAGE_SIZE, Movie, MovieChanges, MovieDetails, MovieDraft, MovieId,
    MoviePage, MovieValidationError, NaturalKey, PageRequest,
};
pub use self::movie_sync::{
    ItemFailurePolicy, MovieSyncConfig, MovieSyncService, ParseItemFailurePolicyError,
    SyncItemFailure, SyncReport, SyncSchedule, is_run_in_progress, run_in_progress_error,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, FULL_NAME_MAX, FULL_NAME_MIN, FullName, NewUser, PasswordDigest, Role, RoleName, User,
    UserCredentials, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use holocron::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
