//! Catalog API response types.
//!
//! Field-level `#[serde(default)]` keeps single-movie payloads lenient,
//! while the list containers require their `movies` array so malformed
//! listing responses fail decoding instead of rendering empty.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// A single movie as returned by listing and detail endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Movie {
    /// Catalog identifier (numeric string).
    #[serde(default)]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Original-language title (may be empty).
    #[serde(default)]
    pub original_title: String,
    /// Release year (may be empty for unreleased entries).
    #[serde(default)]
    pub year: String,
    /// Average rating on a 0-10 scale (`0.0` = unrated).
    #[serde(default)]
    pub rating: f64,
    /// Number of ratings behind the average.
    #[serde(default)]
    pub rating_count: u64,
    /// Genre labels.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Director names.
    #[serde(default)]
    pub directors: Vec<String>,
    /// Lead actor names.
    #[serde(default)]
    pub actors: Vec<String>,
    /// Cover image URL (may be empty).
    #[serde(default)]
    pub cover: String,
    /// Plot summary (may be empty).
    #[serde(default)]
    pub summary: String,
}

/// A paged movie listing: search results and the Top 250.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoviePage {
    /// Movies in this page.
    pub movies: Vec<Movie>,
    /// Total number of matching movies across all pages.
    pub total: u64,
}

/// An unpaged movie listing: in-theater and coming-soon entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieList {
    /// Listed movies.
    pub movies: Vec<Movie>,
}

/// One saved favorite with its bookkeeping fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FavoriteEntry {
    /// The favorited movie.
    pub movie: Movie,
    /// When the favorite was added (ISO 8601 local time).
    #[serde(default)]
    pub added_at: String,
    /// Free-form user note.
    #[serde(default)]
    pub note: String,
}

/// Response of the favorites listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FavoritesResponse {
    /// Saved favorites in the requested order.
    pub favorites: Vec<FavoriteEntry>,
}

/// Response of favorite add/remove mutations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationResponse {
    /// Whether the backend applied the change.
    #[serde(default)]
    pub success: bool,
    /// Confirmation or explanation text.
    #[serde(default)]
    pub message: String,
}

/// Extended attributes served only by the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieExtra {
    /// Production countries.
    ///
    /// The backend sometimes ships these as raw `{"name": ...}` objects
    /// instead of strings; both shapes decode to plain names.
    #[serde(default, deserialize_with = "name_list")]
    pub countries: Vec<String>,
    /// Spoken languages.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Localized runtime label, e.g. `"148 分钟"`.
    #[serde(default)]
    pub duration: String,
    /// External catalog page URL.
    ///
    /// The backend kept the legacy `douban_url` key after switching
    /// upstream providers.
    #[serde(default, rename = "douban_url")]
    pub link: String,
}

/// Response of the movie detail endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetailResponse {
    /// Core movie attributes.
    pub movie: Movie,
    /// Extended attributes.
    pub extra: MovieExtra,
    /// Whether the movie is currently favorited.
    #[serde(default)]
    pub is_favorite: bool,
}

/// One recorded search, used by stats and the history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchRecord {
    /// The searched keyword.
    #[serde(default)]
    pub keyword: String,
    /// How many results the search returned.
    #[serde(default)]
    pub results_count: u64,
    /// When the search happened (ISO 8601 local time).
    #[serde(default)]
    pub timestamp: String,
}

/// Response of the search history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHistoryResponse {
    /// Total number of recorded searches.
    #[serde(default)]
    pub total: u64,
    /// Most recent searches, newest first.
    pub history: Vec<SearchRecord>,
}

/// Response of the stats endpoint.
///
/// With zero favorites the backend sends only `total_favorites` and
/// `message`; every other field defaults to its empty value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatsResponse {
    /// Number of saved favorites.
    #[serde(default)]
    pub total_favorites: u64,
    /// Mean rating across favorites.
    #[serde(default)]
    pub average_rating: f64,
    /// Number of recorded searches.
    #[serde(default)]
    pub total_searches: u64,
    /// Favorite count per genre.
    #[serde(default)]
    pub genres_distribution: HashMap<String, u64>,
    /// Most recent searches, newest first.
    #[serde(default)]
    pub recent_searches: Vec<SearchRecord>,
    /// Set instead of the aggregate fields when there is nothing to
    /// aggregate.
    #[serde(default)]
    pub message: Option<String>,
}

impl StatsResponse {
    /// Genres ranked by favorite count, at most `limit` entries.
    ///
    /// Ties are broken by name so the ranking is stable across calls.
    #[must_use]
    pub fn top_genres(&self, limit: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .genres_distribution
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

/// A name that arrives either as a plain string or wrapped in an
/// object under a `name` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NameField {
    Named { name: String },
    Plain(String),
}

/// Decodes a list of [`NameField`] values into plain strings.
fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<NameField>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|field| match field {
            NameField::Named { name } | NameField::Plain(name) => name,
        })
        .collect())
}
