use std::fmt::Display;

use marquee_catalog::MovieSummary;
use marquee_core::pagination::PaginationState;
use marquee_core::sections::Section;
use serde::Serialize;

/// Sections of a page in a user friendly, table-ish format.
pub struct DisplaySections<'a> {
    pub sections: &'a [Section],
    pub pagination: PaginationState,
}

fn write_movie_line(f: &mut std::fmt::Formatter<'_>, movie: &MovieSummary) -> std::fmt::Result {
    writeln!(
        f,
        "  {vote:>4.1}  {title} (#{id})",
        vote = movie.vote_average,
        title = movie.title,
        id = movie.id
    )
}

impl Display for DisplaySections<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for section in self.sections {
            writeln!(f, "{} ({})", section.label, section.items.len())?;
            if section.items.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for movie in &section.items {
                write_movie_line(f, movie)?;
            }
            writeln!(f)?;
        }
        write!(f, "page {}", self.pagination)
    }
}

/// A single movie with all details the catalog provides.
pub struct DisplayMovie<'a>(pub &'a MovieSummary);

impl Display for DisplayMovie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let movie = self.0;
        writeln!(f, "{} (#{})", movie.title, movie.id)?;
        write!(f, "score: {:.1}", movie.vote_average)?;
        if let Some(url) = movie.artwork_url() {
            write!(f, "\nartwork: {url}")?;
        }
        if !movie.overview.is_empty() {
            write!(f, "\n\n{}", movie.overview)?;
        }
        Ok(())
    }
}

/// JSON representation of a page of sections.
#[derive(Debug, Serialize)]
pub struct JsonSections<'a> {
    pub page: u32,
    pub total_pages: u32,
    pub query: Option<&'a str>,
    pub sections: Vec<JsonSection<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonSection<'a> {
    pub label: &'a str,
    pub items: &'a [MovieSummary],
}

impl<'a> JsonSections<'a> {
    pub fn new(sections: &'a [Section], pagination: PaginationState, query: Option<&'a str>) -> Self {
        Self {
            page: pagination.current_page,
            total_pages: pagination.total_pages,
            query,
            sections: sections
                .iter()
                .map(|section| JsonSection {
                    label: &section.label,
                    items: &section.items,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use marquee_core::classify::classify;
    use marquee_core::pins::PinStore;
    use marquee_core::sections::build_sections;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_sections() -> Vec<Section> {
        let items = vec![
            MovieSummary::new(949, "Heat", 7.9),
            MovieSummary::new(8195, "Ronin", 6.9),
            MovieSummary::new(8046, "Gigli", 2.6),
            MovieSummary::new(11, "Star Wars", 8.2),
        ];
        let pins = PinStore::from_iter([items[3].clone()]);
        build_sections(&pins, classify(&items, &pins))
    }

    #[test]
    fn renders_sections() {
        let sections = sample_sections();
        let display = DisplaySections {
            sections: &sections,
            pagination: PaginationState {
                current_page: 1,
                total_pages: 3,
            },
        };

        assert_eq!(display.to_string(), indoc! {"
            Pinned (1)
               8.2  Star Wars (#11)

            GoodMovies (Over 7.5) (1)
               7.9  Heat (#949)

            Decent Movies (Between 7.5 and 5.0) (1)
               6.9  Ronin (#8195)

            Bad Movies (Under 5.0) (1)
               2.6  Gigli (#8046)

            page 1 of 3"});
    }

    #[test]
    fn renders_empty_sections() {
        let sections = build_sections(&PinStore::new(), Default::default());
        let display = DisplaySections {
            sections: &sections,
            pagination: PaginationState::default(),
        };

        assert_eq!(display.to_string(), indoc! {"
            Pinned (0)
              (none)

            GoodMovies (Over 7.5) (0)
              (none)

            Decent Movies (Between 7.5 and 5.0) (0)
              (none)

            Bad Movies (Under 5.0) (0)
              (none)

            page 1 of 0"});
    }

    #[test]
    fn renders_movie_detail() {
        let mut movie = MovieSummary::new(949, "Heat", 7.9);
        movie.poster_path = "/heat.jpg".to_string();
        movie.overview = "Obsessive master thief Neil McCauley...".to_string();

        assert_eq!(DisplayMovie(&movie).to_string(), indoc! {"
            Heat (#949)
            score: 7.9
            artwork: https://image.tmdb.org/t/p/w500/heat.jpg

            Obsessive master thief Neil McCauley..."});
    }

    #[test]
    fn json_keeps_section_order() {
        let sections = sample_sections();
        let json = serde_json::to_value(JsonSections::new(
            &sections,
            PaginationState {
                current_page: 2,
                total_pages: 5,
            },
            Some("heat"),
        ))
        .unwrap();

        assert_eq!(json["page"], 2);
        assert_eq!(json["query"], "heat");
        let labels: Vec<&str> = json["sections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|section| section["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec![
            "Pinned",
            "GoodMovies (Over 7.5)",
            "Decent Movies (Between 7.5 and 5.0)",
            "Bad Movies (Under 5.0)",
        ]);
        assert_eq!(json["sections"][0]["items"][0]["id"], 11);
    }
}
