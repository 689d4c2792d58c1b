//! Catalog API request parameter types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of entries per listing request.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Request parameters for the search endpoint.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Search keyword.
    pub keyword: String,
    /// Maximum number of results to return.
    pub count: u32,
}

impl SearchParams {
    /// Creates parameters for the given keyword with the default count.
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            count: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the result count.
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Sort criteria accepted by the favorites listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteSort {
    /// Most recently added first (server default).
    #[default]
    AddedAt,
    /// Highest rating first.
    Rating,
    /// Newest release year first.
    Year,
}

impl FavoriteSort {
    /// Query-string value for the `sort_by` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddedAt => "added_at",
            Self::Rating => "rating",
            Self::Year => "year",
        }
    }

    /// The next criterion in cycling order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::AddedAt => Self::Rating,
            Self::Rating => Self::Year,
            Self::Year => Self::AddedAt,
        }
    }
}

impl fmt::Display for FavoriteSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort criterion string is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort criterion: {0} (expected added_at, rating, or year)")]
pub struct ParseFavoriteSortError(String);

impl FromStr for FavoriteSort {
    type Err = ParseFavoriteSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added_at" => Ok(Self::AddedAt),
            "rating" => Ok(Self::Rating),
            "year" => Ok(Self::Year),
            other => Err(ParseFavoriteSortError(String::from(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_search_params_default_count() {
        // Arrange & Act
        let params = SearchParams::new("盗梦空间");

        // Assert
        assert_eq!(params.keyword, "盗梦空间");
        assert_eq!(params.count, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_search_params_count_override() {
        // Arrange & Act
        let params = SearchParams::new("Inception").count(5);

        // Assert
        assert_eq!(params.count, 5);
    }

    #[test]
    fn test_favorite_sort_query_values() {
        // Arrange & Act & Assert
        assert_eq!(FavoriteSort::AddedAt.as_str(), "added_at");
        assert_eq!(FavoriteSort::Rating.as_str(), "rating");
        assert_eq!(FavoriteSort::Year.as_str(), "year");
    }

    #[test]
    fn test_favorite_sort_cycle_wraps() {
        // Arrange & Act & Assert
        assert_eq!(FavoriteSort::AddedAt.next(), FavoriteSort::Rating);
        assert_eq!(FavoriteSort::Rating.next(), FavoriteSort::Year);
        assert_eq!(FavoriteSort::Year.next(), FavoriteSort::AddedAt);
    }

    #[test]
    fn test_favorite_sort_from_str() {
        // Arrange & Act & Assert
        assert_eq!("added_at".parse::<FavoriteSort>().unwrap(), FavoriteSort::AddedAt);
        assert_eq!("rating".parse::<FavoriteSort>().unwrap(), FavoriteSort::Rating);
        assert_eq!("year".parse::<FavoriteSort>().unwrap(), FavoriteSort::Year);
    }

    #[test]
    fn test_favorite_sort_from_str_rejects_unknown() {
        // Arrange & Act
        let result = "popularity".parse::<FavoriteSort>();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("unknown sort criterion: popularity")
        );
    }

    #[test]
    fn test_favorite_sort_serde_round_trip() {
        // Arrange & Act
        let serialized = serde_json::to_string(&FavoriteSort::AddedAt).unwrap();
        let parsed: FavoriteSort = serde_json::from_str("\"rating\"").unwrap();

        // Assert
        assert_eq!(serialized, "\"added_at\"");
        assert_eq!(parsed, FavoriteSort::Rating);
    }
}
