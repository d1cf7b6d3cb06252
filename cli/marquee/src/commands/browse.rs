use anyhow::Result;
use bpaf::Bpaf;
use log::debug;
use marquee_catalog::{ClientTrait, MovieId};
use marquee_core::BrowseSession;
use tracing::instrument;

use super::{catalog_client, resolve_pins};
use crate::config::Config;
use crate::utils::display::{DisplaySections, JsonSections};
use crate::utils::message;

#[derive(Debug, Bpaf, Clone)]
pub struct PageOptions {
    /// Page of results to show
    #[bpaf(
        long,
        short,
        argument("N"),
        guard(at_least_one, "page must be at least 1"),
        fallback(1)
    )]
    pub page: u32,

    /// Pin a movie by its id
    ///
    /// May be repeated, pinned movies are shown first.
    #[bpaf(long("pin"), argument("ID"), many)]
    pub pins: Vec<MovieId>,

    /// Print the sections as JSON
    #[bpaf(long)]
    pub json: bool,
}

fn at_least_one(page: &u32) -> bool {
    *page >= 1
}

// List popular movies
#[derive(Debug, Bpaf, Clone)]
pub struct Browse {
    #[bpaf(external(page_options))]
    pub options: PageOptions,
}

impl Browse {
    #[instrument(name = "browse", fields(page = self.options.page, json = self.options.json), skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = catalog_client(&config)?;
        let pins = resolve_pins(client.as_ref(), &config, &self.options.pins).await?;
        let session = BrowseSession::with_pins(client, pins);
        show_page(session, None, &self.options).await
    }
}

// Search movies by title
#[derive(Debug, Bpaf, Clone)]
pub struct Search {
    #[bpaf(external(page_options))]
    pub options: PageOptions,

    /// Title, or part of the title, to search for
    #[bpaf(positional("QUERY"))]
    pub query: String,
}

impl Search {
    #[instrument(name = "search", fields(query = self.query, page = self.options.page), skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = catalog_client(&config)?;
        let pins = resolve_pins(client.as_ref(), &config, &self.options.pins).await?;
        let session = BrowseSession::with_pins(client, pins);
        show_page(session, Some(&self.query), &self.options).await
    }
}

/// Fetch the requested page and print its sections to stdout.
async fn show_page<C>(
    mut session: BrowseSession<C>,
    query: Option<&str>,
    options: &PageOptions,
) -> Result<()>
where
    C: ClientTrait + Send + Sync + 'static,
{
    load_page(&mut session, query, options.page).await?;

    if options.json {
        debug!("printing sections as JSON");
        let json = JsonSections::new(session.sections(), session.pagination(), session.query());
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if session.last_page().is_some_and(|page| page.items.is_empty()) {
        match session.query() {
            Some(query) => message::warning(format!("No movies found for '{query}'")),
            None => message::warning("No movies found"),
        }
    }

    println!(
        "{}",
        DisplaySections {
            sections: session.sections(),
            pagination: session.pagination(),
        }
    );
    Ok(())
}

/// Bring `session` to `page` of the listing, or of the search for `query`.
async fn load_page<C>(session: &mut BrowseSession<C>, query: Option<&str>, page: u32) -> Result<()>
where
    C: ClientTrait + Send + Sync + 'static,
{
    match query {
        Some(query) => session.search(query)?,
        None => session.start()?,
    };
    session.settle().await?;

    if page != 1 {
        session.go_to_page(page)?;
        session.settle().await?;
    }
    Ok(())
}
