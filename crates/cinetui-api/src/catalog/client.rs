//! `CatalogClient` - movie catalog backend client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method};
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::error::{self, CatalogError};
use super::params::{FavoriteSort, SearchParams};
use super::types::{
    FavoritesResponse, MovieDetailResponse, MovieList, MoviePage, MutationResponse,
    SearchHistoryResponse, StatsResponse,
};

/// Default base URL of a locally running backend.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Movie catalog API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (config, or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Overrides the per-request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// The base URL path is normalized to end with `/` so relative
    /// endpoint paths join below it instead of replacing its last
    /// segment.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// The resolved base URL requests are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// Non-success statuses become [`CatalogError::Api`] with a message
    /// extracted from the error body; undecodable success bodies become
    /// [`CatalogError::Format`]. Nothing is retried.
    #[instrument(skip_all)]
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.base_url.join(path)?;

        let request = self
            .http_client
            .request(method, url)
            .query(query)
            .build()?;

        tracing::debug!(method = %request.method(), url = %request.url(), "catalog API request");

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: error::error_message(status.as_u16(), &body),
            });
        }

        serde_json::from_str(&body).map_err(CatalogError::Format)
    }

    /// Sends a GET request and decodes the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        self.request_json(Method::GET, path, query).await
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> Result<MoviePage, CatalogError> {
        let query = [
            ("q", params.keyword.clone()),
            ("count", params.count.to_string()),
        ];
        self.get_json("api/search", &query).await
    }

    #[instrument(skip_all)]
    async fn top250(&self, start: u32, count: u32) -> Result<MoviePage, CatalogError> {
        let query = [("start", start.to_string()), ("count", count.to_string())];
        self.get_json("api/top250", &query).await
    }

    #[instrument(skip_all)]
    async fn in_theaters(&self, city: &str) -> Result<MovieList, CatalogError> {
        let query = [("city", String::from(city))];
        self.get_json("api/in_theaters", &query).await
    }

    #[instrument(skip_all)]
    async fn coming_soon(&self) -> Result<MovieList, CatalogError> {
        self.get_json("api/coming_soon", &[]).await
    }

    #[instrument(skip_all)]
    async fn favorites(&self, sort: FavoriteSort) -> Result<FavoritesResponse, CatalogError> {
        let query = [("sort_by", String::from(sort.as_str()))];
        self.get_json("api/favorites", &query).await
    }

    #[instrument(skip_all)]
    async fn add_favorite(
        &self,
        movie_id: &str,
        note: Option<&str>,
    ) -> Result<MutationResponse, CatalogError> {
        let path = format!("api/favorites/{movie_id}");
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(note) = note {
            query.push(("note", String::from(note)));
        }
        self.request_json(Method::POST, &path, &query).await
    }

    #[instrument(skip_all)]
    async fn remove_favorite(&self, movie_id: &str) -> Result<MutationResponse, CatalogError> {
        let path = format!("api/favorites/{movie_id}");
        self.request_json(Method::DELETE, &path, &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_detail(&self, movie_id: &str) -> Result<MovieDetailResponse, CatalogError> {
        let path = format!("api/movie/{movie_id}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn stats(&self) -> Result<StatsResponse, CatalogError> {
        self.get_json("api/stats", &[]).await
    }

    #[instrument(skip_all)]
    async fn search_history(&self, limit: u32) -> Result<SearchHistoryResponse, CatalogError> {
        let query = [("limit", limit.to_string())];
        self.get_json("api/search_history", &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::float_cmp)]

    use super::*;

    /// Builds a client pointed at the given mock server.
    fn test_client(uri: &str) -> CatalogClient {
        CatalogClient::builder()
            .base_url(format!("{uri}/").parse().unwrap())
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = CatalogClient::builder().build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_with_user_agent_succeeds() {
        // Arrange & Act
        let result = CatalogClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/").unwrap();

        // Act
        let client = CatalogClient::builder()
            .base_url(custom_url.clone())
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url(), &custom_url);
    }

    #[test]
    fn test_builder_appends_trailing_slash() {
        // Arrange
        let url = Url::parse("http://localhost:8080/prefix").unwrap();

        // Act
        let client = CatalogClient::builder()
            .base_url(url)
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert: endpoint paths must join below the prefix
        assert_eq!(client.base_url().path(), "/prefix/");
        assert_eq!(
            client.base_url().join("api/search").unwrap().path(),
            "/prefix/api/search"
        );
    }

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/search_inception.json");

        // Act
        let page: MoviePage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.total, 2);
        assert_eq!(page.movies.len(), 2);
        let first = &page.movies[0];
        assert_eq!(first.id, "27205");
        assert_eq!(first.title, "盗梦空间");
        assert_eq!(first.original_title, "Inception");
        assert_eq!(first.year, "2010");
        assert!(first.rating > 8.0);
        assert!(first.genres.contains(&String::from("科幻")));
    }

    #[test]
    fn test_parse_top250_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/top250_first_page.json");

        // Act
        let page: MoviePage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.total, 250);
        assert_eq!(page.movies.len(), 3);
        assert_eq!(page.movies[0].title, "肖申克的救赎");
    }

    #[test]
    fn test_parse_favorites_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/favorites.json");

        // Act
        let response: FavoritesResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.favorites.len(), 2);
        let first = &response.favorites[0];
        assert_eq!(first.movie.title, "肖申克的救赎");
        assert!(first.added_at.starts_with("2025-08-10"));
        assert_eq!(first.note, "经典");
    }

    #[test]
    fn test_parse_movie_detail_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/movie_detail_278.json");

        // Act
        let detail: MovieDetailResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(detail.movie.id, "278");
        assert!(detail.is_favorite);
        assert_eq!(detail.extra.countries, vec!["美国"]);
        assert_eq!(detail.extra.duration, "142 分钟");
        assert!(detail.extra.link.contains("/movie/278"));
    }

    #[test]
    fn test_parse_stats_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/stats.json");

        // Act
        let stats: StatsResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(stats.total_favorites, 4);
        assert_eq!(stats.total_searches, 12);
        assert_eq!(stats.genres_distribution.get("剧情"), Some(&4));
        assert_eq!(stats.recent_searches.len(), 2);
        assert!(stats.message.is_none());
    }

    #[test]
    fn test_parse_search_history_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/catalog/search_history.json");

        // Act
        let response: SearchHistoryResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.total, 3);
        assert_eq!(response.history[0].keyword, "盗梦空间");
        assert_eq!(response.history[0].results_count, 4);
    }

    #[tokio::test]
    async fn test_search_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/search_inception.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/search"))
            .and(wiremock::matchers::query_param("q", "盗梦空间"))
            .and(wiremock::matchers::query_param("count", "20"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let params = SearchParams::new("盗梦空间");

        // Act
        let page = client.search(&params).await.unwrap();

        // Assert
        assert_eq!(page.movies.len(), 2);
        assert_eq!(page.movies[0].title, "盗梦空间");
    }

    #[tokio::test]
    async fn test_top250_pagination_params() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/top250_first_page.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/top250"))
            .and(wiremock::matchers::query_param("start", "20"))
            .and(wiremock::matchers::query_param("count", "20"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let page = client.top250(20, 20).await.unwrap();

        // Assert
        assert_eq!(page.total, 250);
    }

    #[tokio::test]
    async fn test_in_theaters_city_param() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/in_theaters_beijing.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/in_theaters"))
            .and(wiremock::matchers::query_param("city", "上海"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let list = client.in_theaters("上海").await.unwrap();

        // Assert
        assert_eq!(list.movies.len(), 2);
    }

    #[tokio::test]
    async fn test_coming_soon_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/coming_soon.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/coming_soon"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let list = client.coming_soon().await.unwrap();

        // Assert
        assert_eq!(list.movies.len(), 1);
        assert_eq!(list.movies[0].rating, 0.0);
    }

    #[tokio::test]
    async fn test_favorites_sort_param() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/favorites.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/favorites"))
            .and(wiremock::matchers::query_param("sort_by", "rating"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let response = client.favorites(FavoriteSort::Rating).await.unwrap();

        // Assert
        assert_eq!(response.favorites.len(), 2);
    }

    #[tokio::test]
    async fn test_add_favorite_posts_with_note() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let body = r#"{"success":true,"message":"已添加到收藏"}"#;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/favorites/278"))
            .and(wiremock::matchers::query_param("note", "必看"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let response = client.add_favorite("278", Some("必看")).await.unwrap();

        // Assert
        assert!(response.success);
        assert_eq!(response.message, "已添加到收藏");
    }

    #[tokio::test]
    async fn test_remove_favorite_uses_delete() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let body = r#"{"success":true,"message":"已取消收藏"}"#;

        wiremock::Mock::given(wiremock::matchers::method("DELETE"))
            .and(wiremock::matchers::path("/api/favorites/278"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let response = client.remove_favorite("278").await.unwrap();

        // Assert
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_movie_detail_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/movie_detail_278.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/movie/278"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let detail = client.movie_detail("278").await.unwrap();

        // Assert
        assert_eq!(detail.movie.title, "肖申克的救赎");
        assert!(detail.is_favorite);
    }

    #[tokio::test]
    async fn test_stats_empty_body_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/stats_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/stats"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let stats = client.stats().await.unwrap();

        // Assert: aggregate fields default when the backend omits them
        assert_eq!(stats.total_favorites, 0);
        assert!(stats.genres_distribution.is_empty());
        assert!(stats.message.is_some());
    }

    #[tokio::test]
    async fn test_search_history_limit_param() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/search_history.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/search_history"))
            .and(wiremock::matchers::query_param("limit", "10"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let response = client.search_history(10).await.unwrap();

        // Assert
        assert_eq!(response.history.len(), 3);
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/catalog/coming_soon.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header("User-Agent", "cinetui/0.0.0"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CatalogClient::builder()
            .base_url(format!("{}/", mock_server.uri()).parse().unwrap())
            .user_agent("cinetui/0.0.0")
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies the header)
        client.coming_soon().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_with_structured_detail() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"detail":{"error":"movie_api_error","message":"搜索服务暂时不可用"}}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.search(&SearchParams::new("test")).await;

        // Assert
        let err = result.unwrap_err();
        match err {
            CatalogError::Api { status, ref message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "搜索服务暂时不可用");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_with_plain_detail() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"detail":"未找到该收藏"}"#;

        wiremock::Mock::given(wiremock::matchers::method("DELETE"))
            .respond_with(wiremock::ResponseTemplate::new(404).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.remove_favorite("999").await;

        // Assert
        let err = result.unwrap_err();
        match err {
            CatalogError::Api { status, ref message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "未找到该收藏");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quota_exhausted_surfaces_server_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"detail":{"error":"quota_exhausted","message":"API 配额已用完，请稍后再试"}}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/search"))
            .respond_with(wiremock::ResponseTemplate::new(403).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.search(&SearchParams::new("盗梦空间")).await;

        // Assert: the server-reported quota message reaches the caller verbatim
        let err = result.unwrap_err();
        assert!(err.to_string().contains("API 配额已用完"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_format_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"movies":"not-an-array","total":1}"#),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.search(&SearchParams::new("test")).await;

        // Assert
        assert!(matches!(result.unwrap_err(), CatalogError::Format(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Arrange: nothing listens on port 1
        let client = CatalogClient::builder()
            .base_url("http://127.0.0.1:1/".parse().unwrap())
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        // Act
        let result = client.stats().await;

        // Assert
        assert!(matches!(result.unwrap_err(), CatalogError::Transport(_)));
    }
}
