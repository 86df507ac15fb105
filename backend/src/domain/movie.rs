//! Catalog record model: movies, their natural key and listing parameters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation errors for movie inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovieValidationError {
    #[error("movie id must be a valid UUID")]
    InvalidId,
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("at least one field must be supplied")]
    EmptyChanges,
    #[error("limit must be between 1 and {max}")]
    InvalidLimit { max: u32 },
}

/// Stable movie identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, MovieValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| MovieValidationError::InvalidId)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for MovieId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

const TITLE_MAX: usize = 255;
const DIRECTOR_MAX: usize = 255;

fn required_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, MovieValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MovieValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > max {
        return Err(MovieValidationError::FieldTooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// The `(title, director)` pair that identifies a movie across soft-deletion.
///
/// # Examples
/// ```
/// use holocron::domain::NaturalKey;
///
/// let key = NaturalKey::new(" A New Hope ", "George Lucas").unwrap();
/// assert_eq!(key.title(), "A New Hope");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    title: String,
    director: String,
}

impl NaturalKey {
    /// Validate and trim both key parts.
    pub fn new(title: &str, director: &str) -> Result<Self, MovieValidationError> {
        Ok(Self {
            title: required_text(title, "title", TITLE_MAX)?,
            director: required_text(director, "director", DIRECTOR_MAX)?,
        })
    }

    /// Movie title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Director name.
    pub fn director(&self) -> &str {
        self.director.as_str()
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.title, self.director)
    }
}

/// Descriptive fields that are not part of the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieDetails {
    /// Opening crawl text.
    pub opening: Option<String>,
    /// Producer credit.
    pub producer: Option<String>,
    /// Release date as published by the source; opaque text.
    pub release_date: String,
}

/// Input for creating a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDraft {
    /// Natural key.
    pub key: NaturalKey,
    /// Descriptive fields.
    pub details: MovieDetails,
}

impl MovieDraft {
    /// Validate raw create inputs.
    pub fn try_from_parts(
        title: &str,
        director: &str,
        release_date: &str,
        opening: Option<String>,
        producer: Option<String>,
    ) -> Result<Self, MovieValidationError> {
        let key = NaturalKey::new(title, director)?;
        let release_date = required_text(release_date, "releaseDate", TITLE_MAX)?;
        Ok(Self {
            key,
            details: MovieDetails {
                opening,
                producer,
                release_date,
            },
        })
    }
}

/// Partial update for an active movie. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<String>,
    pub opening: Option<String>,
    pub producer: Option<String>,
}

impl MovieChanges {
    /// Reject blank key fields and empty change sets.
    pub fn validate(self) -> Result<Self, MovieValidationError> {
        if self == Self::default() {
            return Err(MovieValidationError::EmptyChanges);
        }
        let title = self
            .title
            .map(|value| required_text(&value, "title", TITLE_MAX))
            .transpose()?;
        let director = self
            .director
            .map(|value| required_text(&value, "director", DIRECTOR_MAX))
            .transpose()?;
        let release_date = self
            .release_date
            .map(|value| required_text(&value, "releaseDate", TITLE_MAX))
            .transpose()?;
        Ok(Self {
            title,
            director,
            release_date,
            opening: self.opening,
            producer: self.producer,
        })
    }

    /// Apply the changes to a stored movie, returning the merged values.
    pub fn apply_to(&self, movie: &Movie) -> (NaturalKey, MovieDetails) {
        let key = NaturalKey {
            title: self.title.clone().unwrap_or_else(|| movie.key.title.clone()),
            director: self
                .director
                .clone()
                .unwrap_or_else(|| movie.key.director.clone()),
        };
        let details = MovieDetails {
            opening: self.opening.clone().or_else(|| movie.details.opening.clone()),
            producer: self
                .producer
                .clone()
                .or_else(|| movie.details.producer.clone()),
            release_date: self
                .release_date
                .clone()
                .unwrap_or_else(|| movie.details.release_date.clone()),
        };
        (key, details)
    }
}

/// Stored movie.
///
/// ## Invariants
/// - `deleted_at` is `None` for active rows and set for soft-deleted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// Identifier.
    pub id: MovieId,
    /// Natural key.
    pub key: NaturalKey,
    /// Descriptive fields.
    pub details: MovieDetails,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion time.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Movie {
    /// Whether the movie is visible in the default scope.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Which rows a lookup may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionScope {
    /// Active rows only.
    #[default]
    ActiveOnly,
    /// Active and soft-deleted rows.
    IncludeDeleted,
    /// Soft-deleted rows only.
    DeletedOnly,
}

impl DeletionScope {
    /// Whether a row with the given deletion state is visible.
    pub fn admits(self, deleted_at: Option<DateTime<Utc>>) -> bool {
        match self {
            Self::ActiveOnly => deleted_at.is_none(),
            Self::IncludeDeleted => true,
            Self::DeletedOnly => deleted_at.is_some(),
        }
    }
}

/// Offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Build a page request, falling back to `default_limit` when none is given.
    pub fn new(
        limit: Option<u32>,
        offset: Option<u64>,
        default_limit: u32,
    ) -> Result<Self, MovieValidationError> {
        let limit = limit.unwrap_or(default_limit);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(MovieValidationError::InvalidLimit { max: MAX_PAGE_SIZE });
        }
        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// Maximum rows returned.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows skipped.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// One page of movies with the total matching count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePage {
    /// Rows in this page.
    pub movies: Vec<Movie>,
    /// Count of all matching rows.
    pub total: u64,
    /// Limit used.
    pub limit: u32,
    /// Offset used.
    pub offset: u64,
}
