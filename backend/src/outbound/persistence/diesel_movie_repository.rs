//! PostgreSQL-backed `MovieRepository` implementation using Diesel ORM.
//!
//! Soft deletion only toggles `deleted_at`; no query here issues a `DELETE`.
//! Every lookup is built from [`scoped`] so the deletion filter is applied in
//! one place.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MoviePersistenceError, MovieRepository, NewMovie};
use crate::domain::{
    DeletionScope, Movie, MovieDetails, MovieId, MoviePage, NaturalKey, PageRequest,
};

use super::diesel_error_mapping::{ErrorConstructors, map_diesel_error, map_pool_error};
use super::models::{MovieRow, MovieUpdate, NewMovieRow};
use super::pool::DbPool;
use super::schema::movies;

const MOVIE_ERRORS: ErrorConstructors<MoviePersistenceError> = ErrorConstructors {
    connection: MoviePersistenceError::connection,
    query: MoviePersistenceError::query,
    duplicate: MoviePersistenceError::duplicate,
};

/// Diesel-backed implementation of the `MovieRepository` port.
#[derive(Clone)]
pub struct DieselMovieRepository {
    pool: DbPool,
}

impl DieselMovieRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: diesel::result::Error) -> MoviePersistenceError {
    map_diesel_error(error, &MOVIE_ERRORS)
}

fn scoped(scope: DeletionScope) -> movies::BoxedQuery<'static, Pg> {
    let query = movies::table.into_boxed();
    match scope {
        DeletionScope::ActiveOnly => query.filter(movies::deleted_at.is_null()),
        DeletionScope::IncludeDeleted => query,
        DeletionScope::DeletedOnly => query.filter(movies::deleted_at.is_not_null()),
    }
}

fn row_to_movie(row: MovieRow) -> Result<Movie, MoviePersistenceError> {
    let key = NaturalKey::new(&row.title, &row.director).map_err(|err| {
        MoviePersistenceError::query(format!("stored movie {} invalid: {err}", row.id))
    })?;
    Ok(Movie {
        id: MovieId::from(row.id),
        key,
        details: MovieDetails {
            opening: row.opening,
            producer: row.producer,
            release_date: row.release_date,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
        deleted_at: row.deleted_at,
    })
}

fn rows_to_movies(rows: Vec<MovieRow>) -> Result<Vec<Movie>, MoviePersistenceError> {
    rows.into_iter().map(row_to_movie).collect()
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl MovieRepository for DieselMovieRepository {
    async fn insert(&self, movie: &NewMovie) -> Result<Movie, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let now = Utc::now();
        let new_row = NewMovieRow {
            id: *movie.id.as_uuid(),
            title: movie.key.title(),
            director: movie.key.director(),
            release_date: movie.details.release_date.as_str(),
            opening: movie.details.opening.as_deref(),
            producer: movie.details.producer.as_deref(),
            created_at: now,
            updated_at: now,
        };

        let row: MovieRow = diesel::insert_into(movies::table)
            .values(&new_row)
            .returning(MovieRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_movie(row)
    }

    async fn find_by_id(
        &self,
        id: &MovieId,
        scope: DeletionScope,
    ) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let row: Option<MovieRow> = scoped(scope)
            .filter(movies::id.eq(*id.as_uuid()))
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_movie).transpose()
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let row: Option<MovieRow> = scoped(DeletionScope::ActiveOnly)
            .filter(movies::title.eq(title.to_owned()))
            .order((movies::created_at.asc(), movies::id.asc()))
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_movie).transpose()
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKey,
        scope: DeletionScope,
    ) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let row: Option<MovieRow> = scoped(scope)
            .filter(movies::title.eq(key.title().to_owned()))
            .filter(movies::director.eq(key.director().to_owned()))
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_movie).transpose()
    }

    async fn list_page(
        &self,
        page: PageRequest,
        scope: DeletionScope,
    ) -> Result<MoviePage, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let total: i64 = scoped(scope)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let rows: Vec<MovieRow> = scoped(scope)
            .order((movies::title.asc(), movies::id.asc()))
            .limit(i64::from(page.limit()))
            .offset(to_sql_count(page.offset()))
            .select(MovieRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(MoviePage {
            movies: rows_to_movies(rows)?,
            total: u64::try_from(total).unwrap_or_default(),
            limit: page.limit(),
            offset: page.offset(),
        })
    }

    async fn list_deleted(&self) -> Result<Vec<Movie>, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let rows: Vec<MovieRow> = scoped(DeletionScope::DeletedOnly)
            .order((movies::deleted_at.desc(), movies::id.asc()))
            .select(MovieRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_movies(rows)
    }

    async fn update(
        &self,
        id: &MovieId,
        key: &NaturalKey,
        details: &MovieDetails,
    ) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let changes = MovieUpdate {
            title: key.title(),
            director: key.director(),
            release_date: details.release_date.as_str(),
            opening: details.opening.as_deref(),
            producer: details.producer.as_deref(),
            updated_at: Utc::now(),
        };

        let row: Option<MovieRow> = diesel::update(movies::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(MovieRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_movie).transpose()
    }

    async fn soft_delete(&self, id: &MovieId) -> Result<bool, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let now = Utc::now();
        let affected = diesel::update(
            movies::table
                .filter(movies::id.eq(*id.as_uuid()))
                .filter(movies::deleted_at.is_null()),
        )
        .set((movies::deleted_at.eq(Some(now)), movies::updated_at.eq(now)))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(affected > 0)
    }

    async fn restore(&self, id: &MovieId) -> Result<Option<Movie>, MoviePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &MOVIE_ERRORS))?;

        let restored: Option<MovieRow> = diesel::update(
            movies::table
                .filter(movies::id.eq(*id.as_uuid()))
                .filter(movies::deleted_at.is_not_null()),
        )
        .set((
            movies::deleted_at.eq(None::<chrono::DateTime<Utc>>),
            movies::updated_at.eq(Utc::now()),
        ))
        .returning(MovieRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;

        if let Some(row) = restored {
            return row_to_movie(row).map(Some);
        }

        // Already active, or unknown.
        let row: Option<MovieRow> = movies::table
            .find(*id.as_uuid())
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_movie).transpose()
    }
}
