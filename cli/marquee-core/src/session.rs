//! A browsing session over a movie catalog.
//!
//! The session owns all browsing state.
//! Fetches run on background tasks that hand their result back over a channel,
//! the session applies results one at a time in [BrowseSession::next_event].
//! Since the [PaginationController] admits a single fetch at a time,
//! at most one result is ever pending.

use std::sync::Arc;

use marquee_catalog::{ClientTrait, MovieId, MovieSummary, PageResult};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::classify::{Buckets, classify};
use crate::error::{FetchError, SessionError};
use crate::pagination::{Navigation, PaginationController, PaginationState};
use crate::pins::PinStore;
use crate::sections::{Section, build_sections};

/// Result of a fetch, sent from the fetch task to the session.
#[derive(Debug)]
struct FetchOutcome {
    page: u32,
    /// The query the page was fetched for.
    query: Option<String>,
    result: Result<PageResult, FetchError>,
}

/// Change applied by [BrowseSession::next_event].
#[derive(Debug)]
pub enum SessionEvent {
    /// A page arrived, sections and pagination are updated.
    Updated,
    /// The fetch failed, sections are unchanged and the page is restored.
    Failed(FetchError),
}

pub struct BrowseSession<C> {
    client: Arc<C>,
    pagination: PaginationController,
    pins: PinStore,
    /// Query of the last successful fetch.
    query: Option<String>,
    last_page: Option<PageResult>,
    sections: Vec<Section>,
    sender: mpsc::UnboundedSender<FetchOutcome>,
    receiver: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<C> BrowseSession<C>
where
    C: ClientTrait + Send + Sync + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self::with_pins(client, PinStore::new())
    }

    /// Create a session with movies pinned up front.
    pub fn with_pins(client: Arc<C>, pins: PinStore) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sections = build_sections(&pins, Buckets::default());
        Self {
            client,
            pagination: PaginationController::new(),
            pins,
            query: None,
            last_page: None,
            sections,
            sender,
            receiver,
        }
    }

    /// Fetch the first page of the popular listing.
    pub fn start(&mut self) -> Result<Navigation, SessionError> {
        let navigation = self.pagination.request_first()?;
        self.dispatch(navigation, None);
        Ok(navigation)
    }

    pub fn next_page(&mut self) -> Result<Navigation, SessionError> {
        let navigation = self.pagination.request_next()?;
        self.dispatch(navigation, self.query.clone());
        Ok(navigation)
    }

    pub fn previous_page(&mut self) -> Result<Navigation, SessionError> {
        let navigation = self.pagination.request_previous()?;
        self.dispatch(navigation, self.query.clone());
        Ok(navigation)
    }

    /// Jump to a page of the current listing or search.
    pub fn go_to_page(&mut self, page: u32) -> Result<Navigation, SessionError> {
        let navigation = self.pagination.request_page(page)?;
        self.dispatch(navigation, self.query.clone());
        Ok(navigation)
    }

    pub fn reload(&mut self) -> Result<Navigation, SessionError> {
        let navigation = self.pagination.request_reload()?;
        self.dispatch(navigation, self.query.clone());
        Ok(navigation)
    }

    /// Search from page 1, a blank query returns to the listing.
    ///
    /// The new query takes effect once its first page arrived.
    pub fn search(&mut self, query: &str) -> Result<Navigation, SessionError> {
        let query = Some(query.trim())
            .filter(|query| !query.is_empty())
            .map(str::to_string);
        let navigation = self.pagination.request_first()?;
        self.dispatch(navigation, query);
        Ok(navigation)
    }

    /// Pin a movie.
    ///
    /// Returns `false` if it was pinned already.
    pub fn pin(&mut self, movie: MovieSummary) -> bool {
        let added = self.pins.add(movie);
        if added {
            self.rebuild_sections();
        }
        added
    }

    /// Pin a movie of the last page received.
    pub fn pin_by_id(&mut self, id: MovieId) -> Result<bool, SessionError> {
        if self.pins.contains(id) {
            return Ok(false);
        }
        let movie = self
            .last_page
            .iter()
            .flat_map(|page| &page.items)
            .find(|movie| movie.id == id)
            .cloned()
            .ok_or(SessionError::NotOnPage(id))?;
        Ok(self.pin(movie))
    }

    /// Unpin a movie, it returns to its score section if on the current page.
    pub fn unpin(&mut self, id: MovieId) -> Option<MovieSummary> {
        let removed = self.pins.remove(id);
        if removed.is_some() {
            self.rebuild_sections();
        }
        removed
    }

    /// Wait for the in-flight fetch and apply its result.
    ///
    /// Returns `None` immediately if no fetch is in flight.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if !self.pagination.is_fetching() {
            return None;
        }
        let outcome = self.receiver.recv().await?;
        Some(self.apply(outcome))
    }

    /// Wait for the in-flight fetch, if any, and report its failure.
    pub async fn settle(&mut self) -> Result<(), SessionError> {
        match self.next_event().await {
            Some(SessionEvent::Failed(err)) => Err(SessionError::Fetch(err)),
            Some(SessionEvent::Updated) | None => Ok(()),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_fetching(&self) -> bool {
        self.pagination.is_fetching()
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination.state()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn pins(&self) -> &PinStore {
        &self.pins
    }

    /// The last page received, if any.
    pub fn last_page(&self) -> Option<&PageResult> {
        self.last_page.as_ref()
    }

    fn dispatch(&self, navigation: Navigation, query: Option<String>) {
        let Navigation::Fetch(page) = navigation else {
            return;
        };

        let client = Arc::clone(&self.client);
        let sender = self.sender.clone();
        let fetch_query = query.clone();
        tokio::spawn(async move {
            // The request runs on its own task so that a panic
            // still produces an outcome and ends the fetch.
            let fetch =
                tokio::spawn(async move { client.fetch_page(fetch_query.as_deref(), page).await });
            let result = match fetch.await {
                Ok(result) => result.map_err(FetchError::from),
                Err(err) => Err(FetchError::Aborted(err)),
            };
            // The receiver is dropped only with the session,
            // a result nobody waits for anymore is discarded.
            let _ = sender.send(FetchOutcome {
                page,
                query,
                result,
            });
        });
    }

    #[instrument(skip_all, fields(page = outcome.page, query = ?outcome.query))]
    fn apply(&mut self, outcome: FetchOutcome) -> SessionEvent {
        match outcome.result {
            Ok(page) => {
                if let Err(err) = self.pagination.on_fetch_complete(&page) {
                    debug!(%err, "ignoring page outside of a fetch");
                    return SessionEvent::Updated;
                }
                debug!(
                    total_pages = page.total_pages,
                    n_items = page.items.len(),
                    "applying page"
                );
                self.query = outcome.query;
                self.last_page = Some(page);
                self.rebuild_sections();
                SessionEvent::Updated
            },
            Err(err) => {
                if let Err(pagination_err) = self.pagination.on_fetch_failed() {
                    debug!(%pagination_err, "ignoring failure outside of a fetch");
                }
                debug!(%err, state = %self.pagination.state(), "fetch failed");
                SessionEvent::Failed(err)
            },
        }
    }

    fn rebuild_sections(&mut self) {
        let items = self
            .last_page
            .as_ref()
            .map(|page| page.items.as_slice())
            .unwrap_or_default();
        self.sections = build_sections(&self.pins, classify(items, &self.pins));
    }
}

#[cfg(test)]
mod tests {
    use marquee_catalog::{CatalogClientError, Endpoint, MockClient, MockRequest};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pagination::PaginationError;
    use crate::sections::SectionKind;

    fn listing(page_number: u32, total_pages: u32, items: Vec<MovieSummary>) -> PageResult {
        PageResult {
            page_number,
            total_pages,
            total_results: items.len() as u64,
            items,
        }
    }

    fn first_page() -> PageResult {
        listing(1, 3, vec![
            MovieSummary::new(1, "Heat", 7.9),
            MovieSummary::new(2, "Ronin", 6.9),
            MovieSummary::new(3, "Gigli", 2.6),
        ])
    }

    fn second_page() -> PageResult {
        listing(2, 3, vec![MovieSummary::new(4, "Thief", 7.1)])
    }

    fn section_ids(session: &BrowseSession<MockClient>, kind: SectionKind) -> Vec<u64> {
        session
            .sections()
            .iter()
            .find(|section| section.kind == kind)
            .map(|section| section.items.iter().map(|m| m.id.get()).collect())
            .unwrap_or_default()
    }

    async fn started_session(client: &MockClient) -> BrowseSession<MockClient> {
        client.push_page_response(first_page());
        let mut session = BrowseSession::new(Arc::new(client.clone()));
        assert_eq!(session.start().unwrap(), Navigation::Fetch(1));
        session.settle().await.unwrap();
        session
    }

    #[tokio::test]
    async fn new_session_has_empty_sections() {
        let session = BrowseSession::new(Arc::new(MockClient::new()));
        assert_eq!(session.sections().len(), 4);
        assert!(session.sections().iter().all(|s| s.items.is_empty()));
        assert!(!session.is_fetching());
    }

    #[tokio::test]
    async fn start_builds_sections() {
        let client = MockClient::new();
        let session = started_session(&client).await;

        assert_eq!(section_ids(&session, SectionKind::High), vec![1]);
        assert_eq!(section_ids(&session, SectionKind::Medium), vec![2]);
        assert_eq!(section_ids(&session, SectionKind::Low), vec![3]);
        assert_eq!(session.pagination().to_string(), "1 of 3");
        assert_eq!(client.requests(), vec![MockRequest {
            endpoint: Endpoint::Popular,
            page: Some(1),
        }]);
    }

    #[tokio::test]
    async fn navigation_rejected_while_fetching() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        client.push_page_response(second_page());
        session.next_page().unwrap();
        assert!(session.is_fetching());

        let result = session.next_page();
        assert!(
            matches!(
                result,
                Err(SessionError::Pagination(PaginationError::FetchInFlight))
            ),
            "expected FetchInFlight, found: {result:?}"
        );

        assert!(matches!(
            session.next_event().await,
            Some(SessionEvent::Updated)
        ));
        assert_eq!(session.pagination().to_string(), "2 of 3");
        assert_eq!(section_ids(&session, SectionKind::Medium), vec![4]);
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn next_event_without_fetch_is_none() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;
        assert!(session.next_event().await.is_none());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_sections_and_page() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;
        let sections_before = session.sections().to_vec();

        client.push_error(CatalogClientError::InvalidRequest("offline".to_string()));
        session.next_page().unwrap();
        let result = session.settle().await;

        assert!(
            matches!(result, Err(SessionError::Fetch(_))),
            "expected Fetch error, found: {result:?}"
        );
        assert_eq!(session.sections(), sections_before.as_slice());
        assert_eq!(session.pagination().to_string(), "1 of 3");
        assert!(!session.is_fetching());
    }

    #[tokio::test]
    async fn panicking_fetch_is_reported_as_failure() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        // a detail response makes the mock panic on a page request
        client.push_detail_response(MovieSummary::new(9, "Thief", 7.1));
        session.next_page().unwrap();
        let result = session.settle().await;

        assert!(
            matches!(result, Err(SessionError::Fetch(FetchError::Aborted(_)))),
            "expected Aborted, found: {result:?}"
        );
        assert!(!session.is_fetching());
        assert_eq!(session.pagination().to_string(), "1 of 3");
        assert_eq!(section_ids(&session, SectionKind::High), vec![1]);
    }

    #[tokio::test]
    async fn search_applies_query_on_success() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        client.push_page_response(listing(1, 1, vec![MovieSummary::new(1, "Heat", 7.9)]));
        session.search("  heat ").unwrap();
        assert_eq!(session.query(), None);
        session.settle().await.unwrap();

        assert_eq!(session.query(), Some("heat"));
        assert_eq!(session.pagination().to_string(), "1 of 1");
        assert_eq!(client.requests().last(), Some(&MockRequest {
            endpoint: Endpoint::Search {
                query: "heat".to_string()
            },
            page: Some(1),
        }));
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_query_and_page() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        client.push_page_response(second_page());
        session.next_page().unwrap();
        session.settle().await.unwrap();

        client.push_error(CatalogClientError::InvalidRequest("offline".to_string()));
        session.search("heat").unwrap();
        assert!(session.settle().await.is_err());

        assert_eq!(session.query(), None);
        assert_eq!(session.pagination().current_page, 2);
    }

    #[tokio::test]
    async fn blank_search_returns_to_listing() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        client.push_page_response(first_page());
        session.search("heat").unwrap();
        session.settle().await.unwrap();

        client.push_page_response(first_page());
        session.search("   ").unwrap();
        session.settle().await.unwrap();

        assert_eq!(session.query(), None);
        assert_eq!(
            client.requests().last().map(|r| r.endpoint.clone()),
            Some(Endpoint::Popular)
        );
    }

    #[tokio::test]
    async fn paging_keeps_active_query() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        client.push_page_response(listing(1, 2, vec![]));
        session.search("alien").unwrap();
        session.settle().await.unwrap();

        client.push_page_response(listing(2, 2, vec![]));
        session.next_page().unwrap();
        session.settle().await.unwrap();

        assert_eq!(client.requests().last(), Some(&MockRequest {
            endpoint: Endpoint::Search {
                query: "alien".to_string()
            },
            page: Some(2),
        }));
    }

    #[tokio::test]
    async fn jump_to_page() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        client.push_page_response(listing(3, 3, vec![]));
        assert_eq!(session.go_to_page(3).unwrap(), Navigation::Fetch(3));
        session.settle().await.unwrap();
        assert_eq!(session.pagination().to_string(), "3 of 3");

        let result = session.go_to_page(4);
        assert!(
            matches!(
                result,
                Err(SessionError::Pagination(PaginationError::OutOfRange { .. }))
            ),
            "expected OutOfRange, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn pin_moves_movie_without_fetch() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        assert!(session.pin_by_id(MovieId::new(2)).unwrap());
        assert!(!session.pin_by_id(MovieId::new(2)).unwrap());

        assert_eq!(section_ids(&session, SectionKind::Pinned), vec![2]);
        assert!(section_ids(&session, SectionKind::Medium).is_empty());
        assert!(!session.is_fetching());
        assert_eq!(client.requests().len(), 1);

        let unpinned = session.unpin(MovieId::new(2));
        assert_eq!(unpinned.map(|m| m.title), Some("Ronin".to_string()));
        assert!(section_ids(&session, SectionKind::Pinned).is_empty());
        assert_eq!(section_ids(&session, SectionKind::Medium), vec![2]);
    }

    #[tokio::test]
    async fn pin_of_unknown_movie_fails() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;

        let result = session.pin_by_id(MovieId::new(99));
        assert!(
            matches!(result, Err(SessionError::NotOnPage(id)) if id == MovieId::new(99)),
            "expected NotOnPage, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn pins_survive_page_changes() {
        let client = MockClient::new();
        let mut session = started_session(&client).await;
        session.pin_by_id(MovieId::new(1)).unwrap();

        client.push_page_response(second_page());
        session.next_page().unwrap();
        session.settle().await.unwrap();

        assert_eq!(section_ids(&session, SectionKind::Pinned), vec![1]);
        assert_eq!(section_ids(&session, SectionKind::Medium), vec![4]);
    }

    #[tokio::test]
    async fn initial_pins_are_shown_before_first_page() {
        let pins = PinStore::from_iter([MovieSummary::new(7, "Manhunter", 6.9)]);
        let session = BrowseSession::with_pins(Arc::new(MockClient::new()), pins);
        assert_eq!(section_ids(&session, SectionKind::Pinned), vec![7]);
    }
}
