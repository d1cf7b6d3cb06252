use indexmap::IndexMap;
use marquee_catalog::{MovieId, MovieSummary};

/// Movies pinned by the user, in the order they were pinned.
///
/// Pins live as long as the session that owns the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinStore {
    pins: IndexMap<MovieId, MovieSummary>,
}

impl PinStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a movie.
    ///
    /// Returns `false` and leaves the store untouched
    /// if a movie with the same id is already pinned.
    pub fn add(&mut self, movie: MovieSummary) -> bool {
        if self.pins.contains_key(&movie.id) {
            return false;
        }
        self.pins.insert(movie.id, movie);
        true
    }

    /// Unpin a movie, keeping the order of the remaining pins.
    pub fn remove(&mut self, id: MovieId) -> Option<MovieSummary> {
        self.pins.shift_remove(&id)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.pins.contains_key(&id)
    }

    /// Pinned movies, oldest pin first.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &MovieSummary> {
        self.pins.values()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl FromIterator<MovieSummary> for PinStore {
    fn from_iter<I: IntoIterator<Item = MovieSummary>>(iter: I) -> Self {
        let mut store = PinStore::new();
        for movie in iter {
            store.add(movie);
        }
        store
    }
}
