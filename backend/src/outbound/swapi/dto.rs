//! DTOs for decoding the films collection.
//!
//! Only the fields the catalog stores are decoded; everything else in the
//! payload is ignored.

use serde::Deserialize;

use crate::domain::ports::FeedFilm;

#[derive(Debug, Deserialize)]
pub(super) struct FilmCollectionDto {
    pub(super) results: Vec<FilmDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FilmDto {
    pub(super) title: String,
    pub(super) director: String,
    pub(super) release_date: String,
    #[serde(default)]
    pub(super) opening_crawl: Option<String>,
    #[serde(default)]
    pub(super) producer: Option<String>,
}

impl FilmCollectionDto {
    pub(super) fn into_feed_films(self) -> Vec<FeedFilm> {
        self.results.into_iter().map(FeedFilm::from).collect()
    }
}

impl From<FilmDto> for FeedFilm {
    fn from(dto: FilmDto) -> Self {
        Self {
            title: dto.title,
            director: dto.director,
            release_date: dto.release_date,
            opening_text: dto.opening_crawl.filter(|text| !text.trim().is_empty()),
            producer: dto.producer.filter(|text| !text.trim().is_empty()),
        }
    }
}
