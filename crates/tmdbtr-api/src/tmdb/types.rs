//! TMDB media kinds and shared response types.

use std::fmt;
use std::hash::Hash;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Integer identifier type usable as the `id` of a TMDB item.
///
/// Implemented for `u32` and `u64` only. TMDB ids are never negative, so a
/// negative or fractional `id` on the wire is rejected as a type mismatch
/// instead of being accepted as a signed integer.
pub trait ItemId:
    sealed::Sealed
    + Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl ItemId for u32 {}
impl ItemId for u64 {}

/// A TMDB item kind that is addressed by an integer identifier.
///
/// Used as the type parameter of
/// [`TranslationsCollection`](super::TranslationsCollection) so that a
/// collection fetched for a movie cannot be mixed up with one fetched for a
/// TV series.
pub trait Identifiable {
    /// Identifier type of the item (an integer on the wire).
    type Id: ItemId;
}

/// Movie (`movie/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movie {}

/// TV series (`tv/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvSeries {}

/// TV season (`tv/{id}/season/{season_number}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvSeason {}

/// TV episode (`tv/{id}/season/{season_number}/episode/{episode_number}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvEpisode {}

impl Identifiable for Movie {
    type Id = u64;
}

impl Identifiable for TvSeries {
    type Id = u64;
}

impl Identifiable for TvSeason {
    type Id = u64;
}

impl Identifiable for TvEpisode {
    type Id = u64;
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
