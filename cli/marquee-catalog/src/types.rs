//! Catalog interaction types.
//!
//! These types mirror the JSON documents returned by the catalog API
//! and carry the little semantics the rest of the application relies on.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

/// Prefix for poster and backdrop paths returned by the catalog.
pub const ARTWORK_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Catalog identifier of a movie, stable across pages and queries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct MovieId(u64);

impl MovieId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A single movie as listed by the catalog.
///
/// Two summaries are equal if they share an [MovieId],
/// the remaining fields are informational.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Not every catalog entry has a poster, `null` is read as empty.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Average user score in `[0, 10]`.
    pub vote_average: f64,
}

impl MovieSummary {
    pub fn new(id: u64, title: impl Into<String>, vote_average: f64) -> Self {
        Self {
            id: MovieId::new(id),
            title: title.into(),
            overview: String::new(),
            poster_path: String::new(),
            backdrop_path: None,
            vote_average,
        }
    }

    /// Full URL of the artwork to show for this movie.
    ///
    /// Prefers the backdrop, falls back to the poster,
    /// and is `None` if the catalog has neither.
    pub fn artwork_url(&self) -> Option<String> {
        let path = self
            .backdrop_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(&self.poster_path);
        if path.is_empty() {
            return None;
        }
        Some(format!("{ARTWORK_BASE_URL}{path}"))
    }
}

impl PartialEq for MovieSummary {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MovieSummary {}

impl Hash for MovieSummary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One page of a listing or search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(rename = "page")]
    pub page_number: u32,
    pub total_pages: u32,
    pub total_results: u64,
    #[serde(rename = "results")]
    pub items: Vec<MovieSummary>,
}

impl PageResult {
    /// `page == 1`, evaluated literally.
    pub fn is_first_page(&self) -> bool {
        self.page_number == 1
    }

    /// `page == total_pages`, evaluated literally,
    /// so an empty result set (`total_pages == 0`) is never on its last page.
    pub fn is_last_page(&self) -> bool {
        self.page_number == self.total_pages
    }
}

/// The catalog endpoints used by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Listing of currently popular movies.
    Popular,
    /// Movies matching a free text query.
    Search { query: String },
    /// A single movie.
    Detail { id: MovieId },
}

impl Endpoint {
    /// Select the listing endpoint for an optional query.
    ///
    /// A query that is absent or blank selects [Endpoint::Popular].
    pub fn for_query(query: Option<&str>) -> Self {
        match query.map(str::trim) {
            Some(query) if !query.is_empty() => Endpoint::Search {
                query: query.to_string(),
            },
            _ => Endpoint::Popular,
        }
    }

    /// Path of the endpoint relative to the catalog base url.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Popular => "/movie/popular".to_string(),
            Endpoint::Search { .. } => "/search/movie".to_string(),
            Endpoint::Detail { id } => format!("/movie/{id}"),
        }
    }
}
