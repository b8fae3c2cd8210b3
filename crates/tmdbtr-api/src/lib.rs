//! TMDB translations client library.
//!
//! Models, JSON codec and HTTP client for the translation endpoints of
//! the TMDB API.

/// TMDB API client.
pub mod tmdb;
