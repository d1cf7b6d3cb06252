//! Page navigation with at most one fetch in flight.

use std::fmt::Display;

use marquee_catalog::PageResult;
use thiserror::Error;
use tracing::trace;

/// Current position within a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Never below 1, never above `total_pages` once that is known.
    pub current_page: u32,
    /// `0` until the first page arrived, or for empty results.
    pub total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
        }
    }
}

impl PaginationState {
    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page == self.total_pages
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl Display for PaginationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.current_page, self.total_pages)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    /// `previous_page` is restored if the fetch fails.
    Fetching { previous_page: u32 },
}

/// What the caller has to do after a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Fetch the given page and report back with
    /// [PaginationController::on_fetch_complete] or [PaginationController::on_fetch_failed].
    Fetch(u32),
    /// Already at the requested bound, nothing to fetch.
    Unchanged,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("a page is already being fetched")]
    FetchInFlight,
    #[error("no page is being fetched")]
    NotFetching,
    #[error("page {page} is out of range (1 to {total_pages})")]
    OutOfRange { page: u32, total_pages: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct PaginationController {
    state: PaginationState,
    fetch: FetchState,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.fetch, FetchState::Fetching { .. })
    }

    /// Move to the next page if there is one.
    pub fn request_next(&mut self) -> Result<Navigation, PaginationError> {
        self.ensure_idle()?;
        if !self.state.can_go_forward() {
            trace!(state = %self.state, "already on last page");
            return Ok(Navigation::Unchanged);
        }
        Ok(self.begin(self.state.current_page + 1))
    }

    /// Move to the previous page if there is one.
    pub fn request_previous(&mut self) -> Result<Navigation, PaginationError> {
        self.ensure_idle()?;
        if !self.state.can_go_back() {
            trace!(state = %self.state, "already on first page");
            return Ok(Navigation::Unchanged);
        }
        Ok(self.begin(self.state.current_page - 1))
    }

    /// Fetch the current page again.
    pub fn request_reload(&mut self) -> Result<Navigation, PaginationError> {
        self.ensure_idle()?;
        Ok(self.begin(self.state.current_page))
    }

    /// Start over from page 1, e.g. for a new search.
    ///
    /// Always fetches, since the listing behind the pages may have changed.
    pub fn request_first(&mut self) -> Result<Navigation, PaginationError> {
        self.ensure_idle()?;
        Ok(self.begin(1))
    }

    /// Jump to `page`.
    ///
    /// Before the page count is known any page from 1 up is accepted,
    /// an overshoot is clamped once the result arrives.
    pub fn request_page(&mut self, page: u32) -> Result<Navigation, PaginationError> {
        self.ensure_idle()?;
        let total_pages = self.state.total_pages;
        if page < 1 || (total_pages > 0 && page > total_pages) {
            return Err(PaginationError::OutOfRange { page, total_pages });
        }
        Ok(self.begin(page))
    }

    /// Record a successful fetch and return to idle.
    pub fn on_fetch_complete(&mut self, result: &PageResult) -> Result<(), PaginationError> {
        if !self.is_fetching() {
            return Err(PaginationError::NotFetching);
        }

        self.state.total_pages = result.total_pages;
        if self.state.total_pages > 0 && self.state.current_page > self.state.total_pages {
            trace!(state = %self.state, "clamping current page");
            self.state.current_page = self.state.total_pages;
        }
        self.fetch = FetchState::Idle;

        trace!(state = %self.state, "fetch complete");
        Ok(())
    }

    /// Undo the page change of the failed fetch and return to idle.
    pub fn on_fetch_failed(&mut self) -> Result<(), PaginationError> {
        let FetchState::Fetching { previous_page } = self.fetch else {
            return Err(PaginationError::NotFetching);
        };

        self.state.current_page = previous_page;
        self.fetch = FetchState::Idle;

        trace!(state = %self.state, "fetch failed, page restored");
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), PaginationError> {
        if self.is_fetching() {
            return Err(PaginationError::FetchInFlight);
        }
        Ok(())
    }

    fn begin(&mut self, page: u32) -> Navigation {
        self.fetch = FetchState::Fetching {
            previous_page: self.state.current_page,
        };
        self.state.current_page = page;
        trace!(state = %self.state, "fetch started");
        Navigation::Fetch(page)
    }
}
