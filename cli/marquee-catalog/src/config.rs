//! Configuration types for catalog client construction.

use std::collections::BTreeMap;

/// Base URL of the public movie catalog API (version 3).
pub const DEFAULT_CATALOG_URL: &str = "https://api.themoviedb.org/3";

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API, without a trailing endpoint path.
    pub catalog_url: String,
    /// Key sent as the `api_key` query parameter on every request.
    pub api_key: String,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// User agent override.
    pub user_agent: Option<String>,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: String::new(),
            extra_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}
