//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the film feed, hashing and tokens) expose
//! strongly typed errors so adapters map their failures into predictable
//! variants. Driving ports (login, registration, catalog, sync, authorizer)
//! return domain [`crate::domain::Error`] values ready for inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod authorizer;
mod film_feed_source;
mod login_service;
mod movie_catalog;
mod movie_repository;
mod password_hasher;
mod token_service;
mod user_repository;

pub use authorizer::Authorizer;
#[cfg(test)]
pub use film_feed_source::MockFilmFeedSource;
pub use film_feed_source::{FeedFilm, FilmFeedSource, FilmFeedSourceError, FixtureFilmFeedSource};
#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationService};
pub use login_service::{LoginService, RegistrationService};
#[cfg(test)]
pub use movie_catalog::{MockMovieCommand, MockMovieQuery, MockMovieSyncCommand};
pub use movie_catalog::{MovieCommand, MovieQuery, MovieSyncCommand};
#[cfg(test)]
pub use movie_repository::MockMovieRepository;
pub use movie_repository::{MoviePersistenceError, MovieRepository, NewMovie};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
