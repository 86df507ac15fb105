//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use holocron::outbound::persistence::{DbPool, DieselMovieRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), holocron::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/holocron")).await?;
//! let movies = DieselMovieRepository::new(pool);
//! # let _ = movies;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_movie_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_movie_repository::DieselMovieRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
