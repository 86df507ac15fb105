//! In-memory catalog store.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{MoviePersistenceError, MovieRepository, NewMovie};
use crate::domain::{
    DeletionScope, Movie, MovieDetails, MovieId, MoviePage, NaturalKey, PageRequest,
};

#[derive(Debug, Default)]
struct MovieState {
    rows: Vec<Movie>,
    failing_titles: HashSet<String>,
    writes: usize,
}

impl MovieState {
    fn clash(&self, key: &NaturalKey, except: Option<&MovieId>) -> Option<MoviePersistenceError> {
        self.rows
            .iter()
            .any(|row| &row.key == key && Some(&row.id) != except)
            .then(|| {
                MoviePersistenceError::duplicate(format!(
                    "Key (title, director)=({}, {}) already exists.",
                    key.title(),
                    key.director()
                ))
            })
    }

    fn injected_failure(&self, key: &NaturalKey) -> Option<MoviePersistenceError> {
        self.failing_titles
            .contains(key.title())
            .then(|| MoviePersistenceError::query(format!("injected failure for {key}")))
    }

    fn row_mut(&mut self, id: &MovieId) -> Option<&mut Movie> {
        self.rows.iter_mut().find(|row| &row.id == id)
    }
}

/// Catalog store mirroring the Postgres adapter's observable behaviour.
///
/// The natural key stays unique across active and soft-deleted rows, and
/// timestamps are owned by the store. Writes for selected titles can be made
/// to fail so per-item failure handling can be exercised.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    state: Mutex<MovieState>,
}

impl InMemoryMovieRepository {
    /// Make every insert or update for `title` fail with a query error.
    pub fn fail_writes_for(&self, title: &str) {
        self.lock().failing_titles.insert(title.to_owned());
    }

    /// Copy of every stored row, in insertion order.
    pub fn snapshot(&self) -> Vec<Movie> {
        self.lock().rows.clone()
    }

    /// Number of successful inserts and updates so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MovieState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn insert(&self, movie: &NewMovie) -> Result<Movie, MoviePersistenceError> {
        let mut state = self.lock();
        if let Some(err) = state
            .injected_failure(&movie.key)
            .or_else(|| state.clash(&movie.key, None))
        {
            return Err(err);
        }
        let now = Utc::now();
        let row = Movie {
            id: movie.id,
            key: movie.key.clone(),
            details: movie.details.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.rows.push(row.clone());
        state.writes += 1;
        Ok(row)
    }

    async fn find_by_id(
        &self,
        id: &MovieId,
        scope: DeletionScope,
    ) -> Result<Option<Movie>, MoviePersistenceError> {
        Ok(self
            .lock()
            .rows
            .iter()
            .find(|row| &row.id == id && scope.admits(row.deleted_at))
            .cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MoviePersistenceError> {
        Ok(self
            .lock()
            .rows
            .iter()
            .filter(|row| row.is_active() && row.key.title() == title)
            .min_by_key(|row| row.created_at)
            .cloned())
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKey,
        scope: DeletionScope,
    ) -> Result<Option<Movie>, MoviePersistenceError> {
        Ok(self
            .lock()
            .rows
            .iter()
            .find(|row| &row.key == key && scope.admits(row.deleted_at))
            .cloned())
    }

    async fn list_page(
        &self,
        page: PageRequest,
        scope: DeletionScope,
    ) -> Result<MoviePage, MoviePersistenceError> {
        let mut visible: Vec<Movie> = self
            .lock()
            .rows
            .iter()
            .filter(|row| scope.admits(row.deleted_at))
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            a.key
                .title()
                .cmp(b.key.title())
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        let total = visible.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let movies = visible
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .collect();
        Ok(MoviePage {
            movies,
            total,
            limit: page.limit(),
            offset: page.offset(),
        })
    }

    async fn list_deleted(&self) -> Result<Vec<Movie>, MoviePersistenceError> {
        let mut deleted: Vec<Movie> = self
            .lock()
            .rows
            .iter()
            .filter(|row| !row.is_active())
            .cloned()
            .collect();
        deleted.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(deleted)
    }

    async fn update(
        &self,
        id: &MovieId,
        key: &NaturalKey,
        details: &MovieDetails,
    ) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut state = self.lock();
        if let Some(err) = state
            .injected_failure(key)
            .or_else(|| state.clash(key, Some(id)))
        {
            return Err(err);
        }
        let Some(row) = state.row_mut(id) else {
            return Ok(None);
        };
        row.key = key.clone();
        row.details = details.clone();
        row.updated_at = Utc::now();
        let updated = row.clone();
        state.writes += 1;
        Ok(Some(updated))
    }

    async fn soft_delete(&self, id: &MovieId) -> Result<bool, MoviePersistenceError> {
        let mut state = self.lock();
        match state.row_mut(id) {
            Some(row) if row.is_active() => {
                let now = Utc::now();
                row.deleted_at = Some(now);
                row.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore(&self, id: &MovieId) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut state = self.lock();
        Ok(state.row_mut(id).map(|row| {
            if row.deleted_at.take().is_some() {
                row.updated_at = Utc::now();
            }
            row.clone()
        }))
    }
}
