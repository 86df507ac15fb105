//! Port abstraction for catalog persistence.
//!
//! The store owns `created_at`/`updated_at`. Soft deletion only toggles
//! `deleted_at`; no operation here physically removes a row.

use async_trait::async_trait;

use crate::domain::{
    DeletionScope, Movie, MovieDetails, MovieId, MoviePage, NaturalKey, PageRequest,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by movie repository adapters.
    pub enum MoviePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "movie repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "movie repository query failed: {message}",
        /// The natural key clashes with an existing row, active or not.
        Duplicate { key: String } => "movie already exists: {key}",
    }
}

/// Insert payload for a new active movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    /// Identifier chosen by the caller.
    pub id: MovieId,
    /// Natural key.
    pub key: NaturalKey,
    /// Descriptive fields.
    pub details: MovieDetails,
}

/// Catalog store port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert an active movie.
    async fn insert(&self, movie: &NewMovie) -> Result<Movie, MoviePersistenceError>;

    /// Fetch by identifier within `scope`.
    async fn find_by_id(
        &self,
        id: &MovieId,
        scope: DeletionScope,
    ) -> Result<Option<Movie>, MoviePersistenceError>;

    /// Fetch the earliest-created active movie with this exact title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MoviePersistenceError>;

    /// Fetch by natural key within `scope`.
    async fn find_by_natural_key(
        &self,
        key: &NaturalKey,
        scope: DeletionScope,
    ) -> Result<Option<Movie>, MoviePersistenceError>;

    /// Return one page of movies ordered by title, plus the total count.
    async fn list_page(
        &self,
        page: PageRequest,
        scope: DeletionScope,
    ) -> Result<MoviePage, MoviePersistenceError>;

    /// Return all soft-deleted movies, most recently deleted first.
    async fn list_deleted(&self) -> Result<Vec<Movie>, MoviePersistenceError>;

    /// Overwrite key and descriptive fields in place without touching
    /// `deleted_at`. Returns `None` when no row has this id.
    async fn update(
        &self,
        id: &MovieId,
        key: &NaturalKey,
        details: &MovieDetails,
    ) -> Result<Option<Movie>, MoviePersistenceError>;

    /// Mark an active movie deleted. Returns `false` when no active row matched.
    async fn soft_delete(&self, id: &MovieId) -> Result<bool, MoviePersistenceError>;

    /// Clear `deleted_at`. Returns `None` when no row has this id.
    async fn restore(&self, id: &MovieId) -> Result<Option<Movie>, MoviePersistenceError>;
}
