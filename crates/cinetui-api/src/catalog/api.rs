//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::CatalogError;
use super::params::{FavoriteSort, SearchParams};
use super::types::{
    FavoritesResponse, MovieDetailResponse, MovieList, MoviePage, MutationResponse,
    SearchHistoryResponse, StatsResponse,
};

/// Movie catalog API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Searches movies by keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn search(&self, params: &SearchParams) -> Result<MoviePage, CatalogError>;

    /// Fetches one page of the Top 250 ranking.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn top250(&self, start: u32, count: u32) -> Result<MoviePage, CatalogError>;

    /// Fetches movies currently playing in the given city.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn in_theaters(&self, city: &str) -> Result<MovieList, CatalogError>;

    /// Fetches upcoming releases.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn coming_soon(&self) -> Result<MovieList, CatalogError>;

    /// Lists saved favorites in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn favorites(&self, sort: FavoriteSort) -> Result<FavoritesResponse, CatalogError>;

    /// Saves a movie as a favorite, with an optional note.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn add_favorite(
        &self,
        movie_id: &str,
        note: Option<&str>,
    ) -> Result<MutationResponse, CatalogError>;

    /// Removes a movie from the favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails. Removing an id that is not favorited is reported
    /// by the backend as an HTTP 404.
    async fn remove_favorite(&self, movie_id: &str) -> Result<MutationResponse, CatalogError>;

    /// Fetches full detail for one movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn movie_detail(&self, movie_id: &str) -> Result<MovieDetailResponse, CatalogError>;

    /// Fetches aggregate favorite and search statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn stats(&self) -> Result<StatsResponse, CatalogError>;

    /// Fetches the most recent searches, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request, the HTTP status, or JSON
    /// decoding fails.
    async fn search_history(&self, limit: u32) -> Result<SearchHistoryResponse, CatalogError>;
}
