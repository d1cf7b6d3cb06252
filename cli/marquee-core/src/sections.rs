use std::fmt::Display;

use marquee_catalog::MovieSummary;

use crate::classify::Buckets;
use crate::pins::PinStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Pinned,
    High,
    Medium,
    Low,
}

impl SectionKind {
    /// All kinds in display order.
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Pinned,
        SectionKind::High,
        SectionKind::Medium,
        SectionKind::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Pinned => "Pinned",
            SectionKind::High => "GoodMovies (Over 7.5)",
            SectionKind::Medium => "Decent Movies (Between 7.5 and 5.0)",
            SectionKind::Low => "Bad Movies (Under 5.0)",
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled group of movies, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub label: String,
    pub items: Vec<MovieSummary>,
}

impl Section {
    fn new(kind: SectionKind, items: Vec<MovieSummary>) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            items,
        }
    }
}

/// Assemble the sections shown for a page.
///
/// Always returns the four sections in [SectionKind::ALL] order,
/// empty ones included.
pub fn build_sections(pins: &PinStore, buckets: Buckets) -> Vec<Section> {
    let Buckets { high, medium, low } = buckets;
    vec![
        Section::new(SectionKind::Pinned, pins.list().cloned().collect()),
        Section::new(SectionKind::High, high),
        Section::new(SectionKind::Medium, medium),
        Section::new(SectionKind::Low, low),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::classify::classify;

    #[test]
    fn always_four_sections() {
        let sections = build_sections(&PinStore::new(), Buckets::default());

        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
        assert!(sections.iter().all(|s| s.items.is_empty()));
    }

    #[test]
    fn labels() {
        let sections = build_sections(&PinStore::new(), Buckets::default());
        let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec![
            "Pinned",
            "GoodMovies (Over 7.5)",
            "Decent Movies (Between 7.5 and 5.0)",
            "Bad Movies (Under 5.0)",
        ]);
    }

    #[test]
    fn pinned_movie_appears_once_in_pinned_section() {
        let items = vec![
            MovieSummary::new(1, "Heat", 7.9),
            MovieSummary::new(2, "Ronin", 6.9),
            MovieSummary::new(3, "Gigli", 2.6),
        ];
        let pins = PinStore::from_iter([items[1].clone()]);

        let sections = build_sections(&pins, classify(&items, &pins));

        let occurrences: Vec<SectionKind> = sections
            .iter()
            .filter(|s| s.items.iter().any(|m| m.id == items[1].id))
            .map(|s| s.kind)
            .collect();
        assert_eq!(occurrences, vec![SectionKind::Pinned]);
        assert_eq!(sections[0].items, vec![items[1].clone()]);
        assert!(sections[2].items.is_empty());
    }

    #[test]
    fn pinned_section_keeps_pin_order() {
        let pins = PinStore::from_iter([
            MovieSummary::new(5, "Thief", 7.1),
            MovieSummary::new(4, "Collateral", 7.3),
        ]);
        let sections = build_sections(&pins, Buckets::default());
        let ids: Vec<u64> = sections[0].items.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![5, 4]);
    }
}
