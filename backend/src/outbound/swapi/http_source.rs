//! Reqwest-backed film feed adapter.
//!
//! This adapter owns transport details only: timeout and HTTP error mapping,
//! and JSON decoding into domain feed items.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::FilmCollectionDto;
use crate::domain::ports::{FeedFilm, FilmFeedSource, FilmFeedSourceError};

/// Public films collection used when no endpoint is configured.
pub const DEFAULT_FEED_URL: &str = "https://swapi.dev/api/films/";

const USER_AGENT: &str = concat!("holocron/", env!("CARGO_PKG_VERSION"));

/// Film feed adapter issuing one GET against the films collection.
pub struct SwapiFilmSource {
    client: Client,
    endpoint: Url,
}

impl SwapiFilmSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Endpoint queried by this adapter.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl FilmFeedSource for SwapiFilmSource {
    async fn fetch_all(&self) -> Result<Vec<FeedFilm>, FilmFeedSourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_films(body.as_ref())
    }
}

fn parse_films(body: &[u8]) -> Result<Vec<FeedFilm>, FilmFeedSourceError> {
    let decoded: FilmCollectionDto = serde_json::from_slice(body).map_err(|error| {
        FilmFeedSourceError::decode(format!("invalid films payload: {error}"))
    })?;
    Ok(decoded.into_feed_films())
}

fn map_transport_error(error: reqwest::Error) -> FilmFeedSourceError {
    if error.is_timeout() {
        FilmFeedSourceError::timeout(error.to_string())
    } else {
        FilmFeedSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FilmFeedSourceError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            FilmFeedSourceError::timeout(format!("status {}", status.as_u16()))
        }
        _ => FilmFeedSourceError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
