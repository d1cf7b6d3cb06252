use marquee_catalog::{CatalogClientError, MovieId};
use thiserror::Error;
use tokio::task::JoinError;

use crate::pagination::PaginationError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("failed to load movies")]
    Fetch(#[source] FetchError),

    #[error("movie {0} is not on the current page")]
    NotOnPage(MovieId),
}

/// Why a page could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Catalog(#[from] CatalogClientError),

    /// The fetch task panicked or was cancelled.
    #[error("the request stopped unexpectedly")]
    Aborted(#[source] JoinError),
}
