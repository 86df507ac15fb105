//! Driving ports for catalog reads, writes and reconciliation.

use async_trait::async_trait;

use crate::domain::{
    DeletionScope, Error, Movie, MovieChanges, MovieDraft, MovieId, MoviePage, SyncReport,
};

/// Read-side catalog use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieQuery: Send + Sync {
    /// Page through active movies, applying the configured default page size
    /// when `limit` is absent.
    async fn list(&self, limit: Option<u32>, offset: Option<u64>) -> Result<MoviePage, Error>;

    /// Fetch one movie by id within `scope`.
    async fn find_by_id(&self, id: &MovieId, scope: DeletionScope) -> Result<Movie, Error>;

    /// Fetch one active movie by exact title.
    async fn find_by_title(&self, title: &str) -> Result<Movie, Error>;

    /// List soft-deleted movies.
    async fn list_deleted(&self) -> Result<Vec<Movie>, Error>;
}

/// Write-side catalog use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieCommand: Send + Sync {
    /// Create an active movie.
    async fn create(&self, draft: &MovieDraft) -> Result<Movie, Error>;

    /// Apply a partial update to an active movie.
    async fn update(&self, id: &MovieId, changes: &MovieChanges) -> Result<Movie, Error>;

    /// Soft-delete an active movie.
    async fn soft_delete(&self, id: &MovieId) -> Result<(), Error>;

    /// Clear the deletion mark of a movie.
    async fn restore(&self, id: &MovieId) -> Result<Movie, Error>;
}

/// Reconciliation trigger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieSyncCommand: Send + Sync {
    /// Run one reconciliation pass against the external feed.
    async fn sync_all(&self) -> Result<SyncReport, Error>;
}
