//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::translation::TranslationsCollection;
use super::types::{Movie, TvEpisode, TvSeason, TvSeries};

/// TMDB translations API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches all translations of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn movie_translations(&self, movie_id: u64) -> Result<TranslationsCollection<Movie>>;

    /// Fetches all translations of a TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn tv_series_translations(
        &self,
        series_id: u64,
    ) -> Result<TranslationsCollection<TvSeries>>;

    /// Fetches all translations of a TV season.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn tv_season_translations(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<TranslationsCollection<TvSeason>>;

    /// Fetches all translations of a TV episode.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn tv_episode_translations(
        &self,
        series_id: u64,
        season_number: u32,
        episode_number: u32,
    ) -> Result<TranslationsCollection<TvEpisode>>;
}
