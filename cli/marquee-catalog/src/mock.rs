//! A catalog client that answers from canned responses.
//!
//! Only available in tests or with the `tests` feature enabled.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::ClientTrait;
use crate::error::CatalogClientError;
use crate::types::{Endpoint, MovieId, MovieSummary, PageResult};

type MockField<T> = Arc<Mutex<T>>;

#[derive(Debug)]
enum MockResponse {
    Page(PageResult),
    Detail(MovieSummary),
    Error(CatalogClientError),
}

/// A request received by a [MockClient].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub endpoint: Endpoint,
    /// `None` for detail requests, which take no page from the caller.
    pub page: Option<u32>,
}

/// A catalog client that can be seeded with mock responses.
///
/// Clones share the same response queue and request log,
/// so a test can keep a handle after moving the client elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    responses: MockField<VecDeque<MockResponse>>,
    requests: MockField<Vec<MockRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page for the next `fetch_page` call.
    pub fn push_page_response(&self, page: PageResult) {
        self.push(MockResponse::Page(page));
    }

    /// Queue a movie for the next `movie_detail` call.
    pub fn push_detail_response(&self, movie: MovieSummary) {
        self.push(MockResponse::Detail(movie));
    }

    /// Queue an error for the next call of either kind.
    pub fn push_error(&self, err: CatalogClientError) {
        self.push(MockResponse::Error(err));
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending_responses(&self) -> usize {
        self.responses
            .lock()
            .expect("couldn't acquire mock lock")
            .len()
    }

    fn push(&self, response: MockResponse) {
        self.responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }

    fn next_response(&self, request: MockRequest) -> Option<MockResponse> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .push(request);
        self.responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front()
    }
}

impl ClientTrait for MockClient {
    async fn fetch_page(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> Result<PageResult, CatalogClientError> {
        let request = MockRequest {
            endpoint: Endpoint::for_query(query),
            page: Some(page),
        };
        match self.next_response(request) {
            Some(MockResponse::Page(resp)) => Ok(resp),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(CatalogClientError::InvalidRequest(
                "no mock response queued".to_string(),
            )),
            Some(other) => panic!("expected page response, found {other:?}"),
        }
    }

    async fn movie_detail(&self, id: MovieId) -> Result<MovieSummary, CatalogClientError> {
        let request = MockRequest {
            endpoint: Endpoint::Detail { id },
            page: None,
        };
        match self.next_response(request) {
            Some(MockResponse::Detail(resp)) => Ok(resp),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(CatalogClientError::InvalidRequest(
                "no mock response queued".to_string(),
            )),
            Some(other) => panic!("expected detail response, found {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn responses_are_served_in_order() {
        let client = MockClient::new();
        client.push_page_response(PageResult {
            page_number: 1,
            total_pages: 2,
            total_results: 1,
            items: vec![MovieSummary::new(1, "Alien", 8.1)],
        });
        client.push_error(CatalogClientError::InvalidRequest("boom".to_string()));

        let handle = client.clone();
        let first = client.fetch_page(Some("alien"), 1).await.unwrap();
        assert_eq!(first.items[0].title, "Alien");
        assert!(client.fetch_page(None, 2).await.is_err());
        assert_eq!(handle.pending_responses(), 0);

        assert_eq!(handle.requests(), vec![
            MockRequest {
                endpoint: Endpoint::Search {
                    query: "alien".to_string()
                },
                page: Some(1),
            },
            MockRequest {
                endpoint: Endpoint::Popular,
                page: Some(2),
            },
        ]);
    }

    #[tokio::test]
    async fn empty_queue_is_an_error() {
        let client = MockClient::new();
        let result = client.movie_detail(MovieId::new(3)).await;
        assert!(
            matches!(result, Err(CatalogClientError::InvalidRequest(_))),
            "expected InvalidRequest, found: {result:?}"
        );
    }
}
