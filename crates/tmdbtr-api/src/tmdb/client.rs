//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::codec;
use super::rate_limiter::TmdbRateLimiter;
use super::request::{
    MovieTranslationsRequest, TmdbRequest, TvEpisodeTranslationsRequest,
    TvSeasonTranslationsRequest, TvSeriesTranslationsRequest,
};
use super::translation::TranslationsCollection;
use super::types::{Movie, TmdbErrorResponse, TvEpisode, TvSeason, TvSeries};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff step between retries (multiplied by the retry count).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Rate limiter shared by all requests of this client.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a request and decodes its response.
    ///
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, TMDB answers with a
    /// non-success status, or the body does not decode. Decode failures
    /// carry a [`DecodeError`](super::DecodeError) reachable through
    /// `anyhow::Error::downcast_ref`.
    #[instrument(skip_all)]
    pub async fn send<R: TmdbRequest + Sync>(&self, request: &R) -> Result<R::Response> {
        let path = request.path();
        let body = self.get_body(&path).await?;
        decode_response(&path, &body)
    }

    /// Sends a bearer-authenticated GET with rate limiting and returns the body.
    async fn get_body(&self, path: &str) -> Result<String> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let response = self
                .http_client
                .execute(request)
                .await
                .with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            return response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"));
        }
    }
}

/// Decodes a response body, logging decode failures with the request path.
fn decode_response<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    codec::decode(body.as_bytes())
        .inspect_err(|err| {
            tracing::warn!(path, error = %err, "failed to decode TMDB response");
        })
        .with_context(|| format!("failed to decode JSON response: {path}"))
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip(self))]
    async fn movie_translations(&self, movie_id: u64) -> Result<TranslationsCollection<Movie>> {
        self.send(&MovieTranslationsRequest::new(movie_id)).await
    }

    #[instrument(skip(self))]
    async fn tv_series_translations(
        &self,
        series_id: u64,
    ) -> Result<TranslationsCollection<TvSeries>> {
        self.send(&TvSeriesTranslationsRequest::new(series_id))
            .await
    }

    #[instrument(skip(self))]
    async fn tv_season_translations(
        &self,
        series_id: u64,
        season_number: u32,
    ) -> Result<TranslationsCollection<TvSeason>> {
        self.send(&TvSeasonTranslationsRequest::new(series_id, season_number))
            .await
    }

    #[instrument(skip(self))]
    async fn tv_episode_translations(
        &self,
        series_id: u64,
        season_number: u32,
        episode_number: u32,
    ) -> Result<TranslationsCollection<TvEpisode>> {
        self.send(&TvEpisodeTranslationsRequest::new(
            series_id,
            season_number,
            episode_number,
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::tmdb::codec::DecodeError;

    /// Builds a client pointed at the mock server with no pacing.
    fn mock_client(server: &wiremock::MockServer, token: &str) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token(token)
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults_to_tmdb_v3() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_decode_response_logs_warning_on_failure() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .only()
            .run_with_handle();

        // Act
        let result = with_default(subscriber, || {
            decode_response::<TranslationsCollection<Movie>>("movie/1/translations", r#"{"id":1}"#)
        });

        // Assert
        handle.assert_finished();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("movie/1/translations"));
        assert_eq!(
            err.downcast_ref::<DecodeError>().and_then(DecodeError::key),
            Some("translations")
        );
    }

    #[test]
    fn test_decode_response_success_is_silent() {
        // Arrange
        let (subscriber, handle) = subscriber::mock().only().run_with_handle();

        // Act
        let result = with_default(subscriber, || {
            decode_response::<TranslationsCollection<Movie>>(
                "movie/1/translations",
                r#"{"id":1,"translations":[]}"#,
            )
        });

        // Assert
        handle.assert_finished();
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_movie_translations_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_translations_24428.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/24428/translations"))
            .and(wiremock::matchers::header_exists("Authorization"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.movie_translations(24_428).await.unwrap();

        // Assert
        assert_eq!(result.id(), 24_428);
        assert_eq!(result.translations()[0].language_code, "en");
        assert_eq!(
            result.translations()[0].data.name.as_deref(),
            Some("The Avengers")
        );
    }

    #[tokio::test]
    async fn test_tv_series_translations_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/tv_translations_1399.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1399/translations"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.tv_series_translations(1399).await.unwrap();

        // Assert
        assert_eq!(result.id(), 1399);
        assert_eq!(
            result.translations()[0].data.name.as_deref(),
            Some("Game of Thrones")
        );
    }

    #[tokio::test]
    async fn test_tv_season_translations_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/tv_season_translations_1399_1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1399/season/1/translations"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.tv_season_translations(1399, 1).await.unwrap();

        // Assert
        assert_eq!(result.id(), 3624);
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_tv_episode_translations_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body =
            include_str!("../../../../fixtures/tmdb/tv_episode_translations_1399_1_1.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path(
                "/3/tv/1399/season/1/episode/1/translations",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.tv_episode_translations(1399, 1, 1).await.unwrap();

        // Assert
        assert_eq!(result.id(), 63_056);
        assert_eq!(
            result.translations()[0].data.name.as_deref(),
            Some("Winter Is Coming")
        );
    }

    #[tokio::test]
    async fn test_send_typed_request() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/translations_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/24428/translations"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client
            .send(&MovieTranslationsRequest::new(24_428))
            .await
            .unwrap();

        // Assert
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/translations_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "my-secret-token");

        // Act & Assert (mock expect(1) verifies Authorization header)
        client.movie_translations(24_428).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_query_parameters_are_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/translations_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        client.movie_translations(24_428).await.unwrap();

        // Assert
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.query(), None);
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_missing_translations_key_surfaces_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(r#"{"id":24428}"#))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let err = client.movie_translations(24_428).await.unwrap_err();

        // Assert
        assert!(err.to_string().contains("failed to decode JSON response"));
        let decode_err = err.downcast_ref::<DecodeError>().unwrap();
        assert_eq!(decode_err.key(), Some("translations"));
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.movie_translations(0).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("code=34"));
        assert!(err.contains("could not be found"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.tv_series_translations(1399).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("HTTP 503"));
        assert!(err.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_http_429_retries() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        // Return 429 for all requests: retries + initial = MAX_RETRIES + 1
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string(error_body))
            .expect(u64::from(MAX_RETRIES) + 1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server, "test-token");

        // Act
        let result = client.movie_translations(24_428).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_interval() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/translations_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(2)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let start = std::time::Instant::now();
        client.movie_translations(24_428).await.unwrap();
        client.movie_translations(24_428).await.unwrap();
        let elapsed = start.elapsed();

        // Assert: at least 100ms interval between two requests
        assert!(elapsed >= Duration::from_millis(100));
    }
}
