//! Typed descriptors for TMDB translation endpoints.
//!
//! Each request is a plain `GET` with no query parameters and no body.

use serde::de::DeserializeOwned;

use super::translation::TranslationsCollection;
use super::types::{Movie, TvEpisode, TvSeason, TvSeries};

/// A TMDB API request.
#[allow(clippy::module_name_repetitions)]
pub trait TmdbRequest {
    /// Decoded response body.
    type Response: DeserializeOwned;

    /// Path relative to the API base URL (no leading slash).
    fn path(&self) -> String;
}

/// `GET movie/{id}/translations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieTranslationsRequest {
    /// TMDB movie ID.
    pub id: u64,
}

impl MovieTranslationsRequest {
    /// Creates a request for the given movie.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }
}

impl TmdbRequest for MovieTranslationsRequest {
    type Response = TranslationsCollection<Movie>;

    fn path(&self) -> String {
        format!("movie/{}/translations", self.id)
    }
}

/// `GET tv/{id}/translations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct TvSeriesTranslationsRequest {
    /// TMDB series ID.
    pub id: u64,
}

impl TvSeriesTranslationsRequest {
    /// Creates a request for the given series.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }
}

impl TmdbRequest for TvSeriesTranslationsRequest {
    type Response = TranslationsCollection<TvSeries>;

    fn path(&self) -> String {
        format!("tv/{}/translations", self.id)
    }
}

/// `GET tv/{tv_series_id}/season/{season_number}/translations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct TvSeasonTranslationsRequest {
    /// Parent series ID.
    pub tv_series_id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
}

impl TvSeasonTranslationsRequest {
    /// Creates a request for a season of the given series.
    #[must_use]
    pub const fn new(tv_series_id: u64, season_number: u32) -> Self {
        Self {
            tv_series_id,
            season_number,
        }
    }
}

impl TmdbRequest for TvSeasonTranslationsRequest {
    type Response = TranslationsCollection<TvSeason>;

    fn path(&self) -> String {
        format!(
            "tv/{}/season/{}/translations",
            self.tv_series_id, self.season_number
        )
    }
}

/// `GET tv/{tv_series_id}/season/{season_number}/episode/{episode_number}/translations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct TvEpisodeTranslationsRequest {
    /// Parent series ID.
    pub tv_series_id: u64,
    /// Season number.
    pub season_number: u32,
    /// Episode number within the season.
    pub episode_number: u32,
}

impl TvEpisodeTranslationsRequest {
    /// Creates a request for an episode of the given series.
    #[must_use]
    pub const fn new(tv_series_id: u64, season_number: u32, episode_number: u32) -> Self {
        Self {
            tv_series_id,
            season_number,
            episode_number,
        }
    }
}

impl TmdbRequest for TvEpisodeTranslationsRequest {
    type Response = TranslationsCollection<TvEpisode>;

    fn path(&self) -> String {
        format!(
            "tv/{}/season/{}/episode/{}/translations",
            self.tv_series_id, self.season_number, self.episode_number
        )
    }
}
