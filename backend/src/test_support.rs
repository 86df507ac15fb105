//! Test-only helpers shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and for the `test-support` feature so the
//! integration tests under `tests/` can drive services without Postgres.

pub mod clock;
pub mod movies;
pub mod users;

pub use clock::MutableClock;
pub use movies::InMemoryMovieRepository;
pub use users::InMemoryUserRepository;
