//! Star Wars API outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `FilmFeedSource`
//! port against the public films collection.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_FEED_URL, SwapiFilmSource};
