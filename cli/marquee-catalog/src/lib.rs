//! HTTP client infrastructure for the movie catalog API.
//!
//! This crate provides:
//! - HTTP client construction with api key authentication
//! - The error taxonomy for catalog requests
//! - Wire types for movie listings, searches and details
//! - A canned-response client for tests of dependent crates (feature-gated)
//!
//! ## Usage
//!
//! ```ignore
//! use marquee_catalog::{CatalogClient, CatalogClientConfig, ClientTrait};
//!
//! let config = CatalogClientConfig {
//!     api_key: key,
//!     ..CatalogClientConfig::default()
//! };
//!
//! let client = CatalogClient::new(config)?;
//! let page = client.fetch_page(Some("heat"), 1).await?;
//! ```

mod client;
mod config;
mod error;
mod types;

#[cfg(any(test, feature = "tests"))]
mod mock;

pub use client::{CatalogClient, ClientTrait};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL};
pub use error::{ApiErrorResponse, CatalogClientError};
#[cfg(any(test, feature = "tests"))]
pub use mock::{MockClient, MockRequest};
pub use types::{ARTWORK_BASE_URL, Endpoint, MovieId, MovieSummary, PageResult};
