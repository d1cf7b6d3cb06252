//! Partitioning of a result page into score bands.

use itertools::Itertools;
use marquee_catalog::MovieSummary;

use crate::pins::PinStore;

/// Scores strictly above this are rated high.
pub const HIGH_SCORE_THRESHOLD: f64 = 7.5;
/// Scores at or below this are rated low.
pub const LOW_SCORE_THRESHOLD: f64 = 5.0;

/// Score band of a single movie.
///
/// The bands cover every score:
/// `high > 7.5`, `5.0 < medium <= 7.5`, `low <= 5.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn of(vote_average: f64) -> Self {
        if vote_average > HIGH_SCORE_THRESHOLD {
            ScoreBand::High
        } else if vote_average > LOW_SCORE_THRESHOLD {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Unpinned movies of a page, by score band,
/// each sorted by descending score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub high: Vec<MovieSummary>,
    pub medium: Vec<MovieSummary>,
    pub low: Vec<MovieSummary>,
}

/// Sort `items` into score bands, leaving out pinned movies.
///
/// Sorting is stable: movies with equal scores
/// keep the order in which the catalog returned them.
pub fn classify(items: &[MovieSummary], pins: &PinStore) -> Buckets {
    let mut buckets = Buckets::default();

    let ranked = items
        .iter()
        .filter(|movie| !pins.contains(movie.id))
        .sorted_by(|a, b| b.vote_average.total_cmp(&a.vote_average));

    for movie in ranked {
        let bucket = match ScoreBand::of(movie.vote_average) {
            ScoreBand::High => &mut buckets.high,
            ScoreBand::Medium => &mut buckets.medium,
            ScoreBand::Low => &mut buckets.low,
        };
        bucket.push(movie.clone());
    }

    buckets
}
