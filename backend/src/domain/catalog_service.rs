//! Catalog domain service.
//!
//! Implements the movie query and command driving ports on top of the catalog
//! store. Natural-key clashes are detected by the store's unique constraint,
//! so active and soft-deleted clashes produce the same conflict.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    MovieCommand, MoviePersistenceError, MovieQuery, MovieRepository, NewMovie,
};
use crate::domain::{
    DeletionScope, Error, Movie, MovieChanges, MovieDraft, MovieId, MoviePage, PageRequest,
};

/// Default number of movies per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const MOVIE_NOT_FOUND: &str = "movie not found";

pub(crate) fn map_movie_error(error: MoviePersistenceError) -> Error {
    match error {
        MoviePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("movie repository unavailable: {message}"))
        }
        MoviePersistenceError::Query { message } => {
            Error::internal(format!("movie repository error: {message}"))
        }
        MoviePersistenceError::Duplicate { key } => {
            Error::conflict(format!("movie already exists: {key}"))
        }
    }
}

/// Immutable catalog configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Page size used when a listing request does not name one.
    pub default_page_size: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Catalog service implementing [`MovieQuery`] and [`MovieCommand`].
pub struct CatalogService<R: ?Sized> {
    movies: Arc<R>,
    settings: CatalogSettings,
}

impl<R: ?Sized> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            movies: Arc::clone(&self.movies),
            settings: self.settings,
        }
    }
}

impl<R: ?Sized> CatalogService<R> {
    /// Create a catalog service over `movies`.
    pub fn new(movies: Arc<R>, settings: CatalogSettings) -> Self {
        Self { movies, settings }
    }
}

#[async_trait]
impl<R> MovieQuery for CatalogService<R>
where
    R: MovieRepository + ?Sized,
{
    async fn list(&self, limit: Option<u32>, offset: Option<u64>) -> Result<MoviePage, Error> {
        let page = PageRequest::new(limit, offset, self.settings.default_page_size)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.movies
            .list_page(page, DeletionScope::ActiveOnly)
            .await
            .map_err(map_movie_error)
    }

    async fn find_by_id(&self, id: &MovieId, scope: DeletionScope) -> Result<Movie, Error> {
        self.movies
            .find_by_id(id, scope)
            .await
            .map_err(map_movie_error)?
            .ok_or_else(|| Error::not_found(MOVIE_NOT_FOUND))
    }

    async fn find_by_title(&self, title: &str) -> Result<Movie, Error> {
        let term = title.trim();
        if term.is_empty() {
            return Err(Error::invalid_request("query term is required"));
        }
        self.movies
            .find_by_title(term)
            .await
            .map_err(map_movie_error)?
            .ok_or_else(|| Error::not_found(MOVIE_NOT_FOUND))
    }

    async fn list_deleted(&self) -> Result<Vec<Movie>, Error> {
        self.movies.list_deleted().await.map_err(map_movie_error)
    }
}

#[async_trait]
impl<R> MovieCommand for CatalogService<R>
where
    R: MovieRepository + ?Sized,
{
    async fn create(&self, draft: &MovieDraft) -> Result<Movie, Error> {
        let movie = self
            .movies
            .insert(&NewMovie {
                id: MovieId::random(),
                key: draft.key.clone(),
                details: draft.details.clone(),
            })
            .await
            .map_err(map_movie_error)?;
        info!(movie_id = %movie.id, "created movie");
        Ok(movie)
    }

    async fn update(&self, id: &MovieId, changes: &MovieChanges) -> Result<Movie, Error> {
        let changes = changes
            .clone()
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let current = self.find_by_id(id, DeletionScope::ActiveOnly).await?;
        let (key, details) = changes.apply_to(&current);

        let updated = self
            .movies
            .update(id, &key, &details)
            .await
            .map_err(map_movie_error)?
            .ok_or_else(|| Error::not_found(MOVIE_NOT_FOUND))?;
        info!(movie_id = %id, "updated movie");
        Ok(updated)
    }

    async fn soft_delete(&self, id: &MovieId) -> Result<(), Error> {
        if self.movies.soft_delete(id).await.map_err(map_movie_error)? {
            info!(movie_id = %id, "soft-deleted movie");
            Ok(())
        } else {
            Err(Error::not_found(MOVIE_NOT_FOUND))
        }
    }

    async fn restore(&self, id: &MovieId) -> Result<Movie, Error> {
        let movie = self
            .movies
            .restore(id)
            .await
            .map_err(map_movie_error)?
            .ok_or_else(|| Error::not_found(MOVIE_NOT_FOUND))?;
        info!(movie_id = %id, "restored movie");
        Ok(movie)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
