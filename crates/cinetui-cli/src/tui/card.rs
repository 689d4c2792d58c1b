//! Display formatting for movie rows and detail fields.

use cinetui_api::catalog::Movie;

/// Maximum number of genre tags shown on a card.
pub const MAX_GENRE_TAGS: usize = 3;

/// Display fields for one movie row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    /// Movie title.
    pub title: String,
    /// Star rating label, or a fixed placeholder when unrated.
    pub rating: String,
    /// Release year, or a fixed placeholder when unknown.
    pub year: String,
    /// Up to [`MAX_GENRE_TAGS`] genre tags.
    pub genres: Vec<String>,
}

impl MovieCard {
    /// Builds the display fields for a movie.
    #[must_use]
    pub fn from_movie(movie: &Movie) -> Self {
        let rating = if movie.rating > 0.0 {
            format!("\u{2b50} {}", movie.rating)
        } else {
            String::from("No rating")
        };
        let year = if movie.year.is_empty() {
            String::from("Unknown")
        } else {
            movie.year.clone()
        };
        Self {
            title: movie.title.clone(),
            rating,
            year,
            genres: movie.genres.iter().take(MAX_GENRE_TAGS).cloned().collect(),
        }
    }

    /// Genre tags joined for single-cell rendering.
    #[must_use]
    pub fn genre_label(&self) -> String {
        self.genres.join(" / ")
    }
}

/// Formats a count with thousands separators (e.g. 2000000 -> "2,000,000").
#[allow(clippy::arithmetic_side_effects)]
#[must_use]
pub fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Shortens an ISO-8601 timestamp to its date part for table display.
///
/// Unparseable input is passed through unchanged.
#[must_use]
pub fn short_date(timestamp: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .map_or_else(|_| String::from(timestamp), |dt| dt.format("%Y-%m-%d").to_string())
}
