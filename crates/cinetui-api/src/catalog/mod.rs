//! Movie catalog API client module.
//!
//! Handles HTTP requests to the catalog backend (search, Top 250,
//! theater listings, favorites, stats) and decodes its JSON responses
//! into typed structures.

mod api;
mod client;
mod error;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::CatalogError;
pub use params::{DEFAULT_PAGE_SIZE, FavoriteSort, ParseFavoriteSortError, SearchParams};
pub use types::{
    FavoriteEntry, FavoritesResponse, Movie, MovieDetailResponse, MovieExtra, MovieList, MoviePage,
    MutationResponse, SearchHistoryResponse, SearchRecord, StatsResponse,
};
