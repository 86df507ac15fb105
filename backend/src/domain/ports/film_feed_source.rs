//! Driven port for fetching the external film feed.
//!
//! The feed is small and returned whole; there is no cursor contract.

use async_trait::async_trait;

use super::define_port_error;

/// One film as published by the external feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFilm {
    /// Film title.
    pub title: String,
    /// Director credit.
    pub director: String,
    /// Release date text.
    pub release_date: String,
    /// Opening crawl.
    pub opening_text: Option<String>,
    /// Producer credit.
    pub producer: Option<String>,
}

define_port_error! {
    /// Errors surfaced while calling the film feed.
    pub enum FilmFeedSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } => "film feed transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "film feed timeout: {message}",
        /// The feed answered with a non-success status.
        Status { status: u16, message: String } =>
            "film feed returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "film feed decode failed: {message}",
    }
}

/// Port for reading the full external film feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmFeedSource: Send + Sync {
    /// Fetch every film in feed order.
    async fn fetch_all(&self) -> Result<Vec<FeedFilm>, FilmFeedSourceError>;
}

/// Fixture source serving a fixed list of films.
#[derive(Debug, Clone, Default)]
pub struct FixtureFilmFeedSource {
    films: Vec<FeedFilm>,
}

impl FixtureFilmFeedSource {
    /// Serve `films` on every call.
    pub fn new(films: Vec<FeedFilm>) -> Self {
        Self { films }
    }
}

#[async_trait]
impl FilmFeedSource for FixtureFilmFeedSource {
    async fn fetch_all(&self) -> Result<Vec<FeedFilm>, FilmFeedSourceError> {
        Ok(self.films.clone())
    }
}
