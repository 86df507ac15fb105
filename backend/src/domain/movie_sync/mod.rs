//! Reconciliation of the catalog against the external film feed.
//!
//! Each feed item is matched to a stored movie by natural key across active
//! and soft-deleted rows. Missing movies are inserted, differing ones are
//! overwritten in place and identical ones are left untouched, so repeated
//! runs over an unchanged feed perform no writes. Soft-deleted rows keep
//! their deletion mark when refreshed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::catalog_service::map_movie_error;
use crate::domain::ports::{FeedFilm, FilmFeedSource, MovieRepository, MovieSyncCommand, NewMovie};
use crate::domain::{DeletionScope, Error, MovieDraft, MovieId};

mod schedule;

pub use schedule::SyncSchedule;

/// What a run does when one feed item cannot be reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFailurePolicy {
    /// Stop at the first failing item and fail the run. Earlier items stay
    /// committed.
    #[default]
    Abort,
    /// Record the failure in the report and move on.
    Continue,
}

impl fmt::Display for ItemFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abort => "abort",
            Self::Continue => "continue",
        })
    }
}

/// Error returned when parsing an unknown failure policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item failure policy: {0} (expected abort or continue)")]
pub struct ParseItemFailurePolicyError(String);

impl FromStr for ItemFailurePolicy {
    type Err = ParseItemFailurePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            _ => Err(ParseItemFailurePolicyError(s.to_owned())),
        }
    }
}

/// Sync service configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovieSyncConfig {
    /// Per-item failure handling.
    pub item_failure_policy: ItemFailurePolicy,
}

/// One feed item that could not be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItemFailure {
    pub title: String,
    pub director: String,
    pub message: String,
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Items received from the feed.
    pub fetched: usize,
    /// Items inserted as new movies.
    pub created: usize,
    /// Items whose stored copy was overwritten.
    pub updated: usize,
    /// Items already matching their stored copy.
    pub unchanged: usize,
    /// Items skipped under [`ItemFailurePolicy::Continue`].
    pub failures: Vec<SyncItemFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconciled {
    Created,
    Updated,
    Unchanged,
}

const RUN_IN_PROGRESS: &str = "runInProgress";

/// Conflict returned when a run is requested while another is active.
///
/// The error carries a `runInProgress` detail so callers can tell it apart
/// from a conflict raised by a single feed item.
pub fn run_in_progress_error() -> Error {
    Error::conflict("movie sync already in progress").with_details(json!({ RUN_IN_PROGRESS: true }))
}

/// Whether `error` reports a run already in progress.
pub fn is_run_in_progress(error: &Error) -> bool {
    error
        .details()
        .and_then(|details| details.get(RUN_IN_PROGRESS))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

/// Sync service implementing [`MovieSyncCommand`].
///
/// Runs are single-flight: a run requested while another is in progress is
/// rejected with a conflict instead of queueing.
pub struct MovieSyncService {
    source: Arc<dyn FilmFeedSource>,
    movies: Arc<dyn MovieRepository>,
    config: MovieSyncConfig,
    run_lock: Mutex<()>,
}

impl MovieSyncService {
    /// Create a sync service.
    pub fn new(
        source: Arc<dyn FilmFeedSource>,
        movies: Arc<dyn MovieRepository>,
        config: MovieSyncConfig,
    ) -> Self {
        Self {
            source,
            movies,
            config,
            run_lock: Mutex::new(()),
        }
    }

    async fn reconcile(&self, film: &FeedFilm) -> Result<Reconciled, Error> {
        let draft = MovieDraft::try_from_parts(
            &film.title,
            &film.director,
            &film.release_date,
            film.opening_text.clone(),
            film.producer.clone(),
        )
        .map_err(|err| Error::invalid_request(format!("invalid feed item: {err}")))?;

        let existing = self
            .movies
            .find_by_natural_key(&draft.key, DeletionScope::IncludeDeleted)
            .await
            .map_err(map_movie_error)?;

        match existing {
            None => {
                self.movies
                    .insert(&NewMovie {
                        id: MovieId::random(),
                        key: draft.key,
                        details: draft.details,
                    })
                    .await
                    .map_err(map_movie_error)?;
                Ok(Reconciled::Created)
            }
            Some(stored) if stored.details == draft.details => Ok(Reconciled::Unchanged),
            Some(stored) => {
                self.movies
                    .update(&stored.id, &draft.key, &draft.details)
                    .await
                    .map_err(map_movie_error)?
                    .ok_or_else(|| Error::not_found("movie removed during sync"))?;
                Ok(Reconciled::Updated)
            }
        }
    }
}

#[async_trait]
impl MovieSyncCommand for MovieSyncService {
    async fn sync_all(&self) -> Result<SyncReport, Error> {
        let Ok(_running) = self.run_lock.try_lock() else {
            warn!("movie sync requested while another run is in progress");
            return Err(run_in_progress_error());
        };

        let films = self.source.fetch_all().await.map_err(|err| {
            warn!(error = %err, "film feed fetch failed");
            Error::service_unavailable("film feed unavailable")
        })?;

        let mut report = SyncReport {
            fetched: films.len(),
            ..SyncReport::default()
        };
        for film in &films {
            match self.reconcile(film).await {
                Ok(Reconciled::Created) => report.created += 1,
                Ok(Reconciled::Updated) => report.updated += 1,
                Ok(Reconciled::Unchanged) => report.unchanged += 1,
                Err(err) => {
                    warn!(
                        title = %film.title,
                        director = %film.director,
                        error = %err,
                        policy = %self.config.item_failure_policy,
                        "feed item failed to reconcile"
                    );
                    match self.config.item_failure_policy {
                        ItemFailurePolicy::Abort => {
                            return Err(err.with_details(json!({
                                "title": film.title,
                                "director": film.director,
                            })));
                        }
                        ItemFailurePolicy::Continue => report.failures.push(SyncItemFailure {
                            title: film.title.clone(),
                            director: film.director.clone(),
                            message: err.message().to_owned(),
                        }),
                    }
                }
            }
        }

        info!(
            fetched = report.fetched,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failures.len(),
            "movie sync finished"
        );
        Ok(report)
    }
}
