//! Catalog client for the movie catalog HTTP API.

use std::fmt::Debug;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::CatalogClientError;
use crate::types::{Endpoint, MovieId, MovieSummary, PageResult};

/// A client for the movie catalog.
///
/// Every call is a single request without retries,
/// callers decide whether and when to try again.
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        Url::parse(&config.catalog_url).map_err(|e| {
            CatalogClientError::InvalidRequest(format!(
                "catalog url '{}' is not valid: {e}",
                config.catalog_url
            ))
        })?;

        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Send a GET request and decode the JSON body.
    ///
    /// The body is read completely before decoding so that transfer
    /// failures and malformed documents are reported separately.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        page: u32,
    ) -> Result<T, CatalogClientError> {
        let url = endpoint_url(
            &self.config.catalog_url,
            &self.config.api_key,
            endpoint,
            page,
        )?;

        debug!(path = %endpoint.path(), page, "sending catalog request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(CatalogClientError::Transport)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(CatalogClientError::Transport)?;

        debug!(%status, bytes = body.len(), "received catalog response");

        if !status.is_success() {
            return Err(CatalogClientError::from_status(status, &body));
        }

        serde_json::from_slice(&body).map_err(CatalogClientError::Decode)
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The catalog API interface consumed by the browsing pipeline.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the catalog via [`CatalogClient`]
/// - **Mock** (tests): canned responses without HTTP
///
/// The returned futures are `Send` so calls can be driven
/// from a background task.
pub trait ClientTrait {
    /// Fetch one page of movies.
    ///
    /// A non-blank `query` searches the catalog,
    /// otherwise the popular listing is fetched.
    fn fetch_page(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> impl Future<Output = Result<PageResult, CatalogClientError>> + Send;

    /// Fetch a single movie.
    fn movie_detail(
        &self,
        id: MovieId,
    ) -> impl Future<Output = Result<MovieSummary, CatalogClientError>> + Send;
}

impl ClientTrait for CatalogClient {
    #[instrument(skip(self), fields(catalog_url = %self.config.catalog_url))]
    async fn fetch_page(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> Result<PageResult, CatalogClientError> {
        validate_page(page)?;
        let endpoint = Endpoint::for_query(query);
        let result: PageResult = self.get_json(&endpoint, page).await?;

        debug!(
            page = result.page_number,
            total_pages = result.total_pages,
            n_items = result.items.len(),
            "received page"
        );

        Ok(result)
    }

    #[instrument(skip(self), fields(catalog_url = %self.config.catalog_url))]
    async fn movie_detail(&self, id: MovieId) -> Result<MovieSummary, CatalogClientError> {
        // the detail endpoint ignores `page`, it is sent like on every other request
        self.get_json(&Endpoint::Detail { id }, 1).await
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn validate_page(page: u32) -> Result<(), CatalogClientError> {
    if page < 1 {
        return Err(CatalogClientError::InvalidRequest(format!(
            "page must be at least 1, got {page}"
        )));
    }
    Ok(())
}

/// Build the full request url for an endpoint.
///
/// `page` and `api_key` are sent on every request, `query` only to search.
fn endpoint_url(
    catalog_url: &str,
    api_key: &str,
    endpoint: &Endpoint,
    page: u32,
) -> Result<Url, CatalogClientError> {
    let base = catalog_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}{}", endpoint.path())).map_err(|e| {
        CatalogClientError::InvalidRequest(format!("catalog url '{catalog_url}' is not valid: {e}"))
    })?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("page", &page.to_string());
        pairs.append_pair("api_key", api_key);
        if let Endpoint::Search { query } = endpoint {
            pairs.append_pair("query", query);
        }
    }

    Ok(url)
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client shared by all catalog requests.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| {
                    CatalogClientError::InvalidRequest(e.to_string())
                },
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| {
                    CatalogClientError::InvalidRequest(e.to_string())
                },
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        has_api_key = !config.api_key.is_empty(),
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("marquee/{}", env!("CARGO_PKG_VERSION")));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60))
        .user_agent(user_agent)
        .build()
        .map_err(|e| CatalogClientError::InvalidRequest(e.to_string()))
}
