//! TMDB API client module.
//!
//! Decodes the `*/translations` endpoints of the TMDB API v3 into typed
//! translation collections, and fetches them over HTTP.

mod api;
mod client;
mod codec;
mod rate_limiter;
mod request;
mod translation;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use codec::{
    DecodeError, EncodeError, decode, decode_value, encode, encode_pretty, encode_value,
};
#[allow(clippy::module_name_repetitions)]
pub use request::{
    MovieTranslationsRequest, TmdbRequest, TvEpisodeTranslationsRequest,
    TvSeasonTranslationsRequest, TvSeriesTranslationsRequest,
};
pub use translation::{Translation, TranslationData, TranslationsCollection};
pub use types::{Identifiable, ItemId, Movie, TvEpisode, TvSeason, TvSeries};
