//! Browsing logic for the movie catalog, independent of any presentation.
//!
//! A page of results is split into score bands by [classify::classify],
//! pinned movies are taken out of the bands and shown first,
//! and [sections::build_sections] turns both into the sections to render.
//! [session::BrowseSession] drives this for a client,
//! one page fetch at a time as enforced by [pagination::PaginationController].

pub mod classify;
pub mod error;
pub mod pagination;
pub mod pins;
pub mod sections;
pub mod session;

pub use error::{FetchError, SessionError};
pub use session::{BrowseSession, SessionEvent};
