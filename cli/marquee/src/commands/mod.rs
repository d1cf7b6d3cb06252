mod browse;
mod interactive;
mod show;

use std::sync::Arc;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use futures::future::try_join_all;
use indoc::indoc;
use log::debug;
use marquee_catalog::{CatalogClient, ClientTrait, MovieId};
use marquee_core::pins::PinStore;

use crate::config::Config;

const MARQUEE_DESCRIPTION: &str = indoc! {"
    Browse the movie catalog from your terminal.

    Movies are grouped by their score, pinned movies are always shown first."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(MARQUEE_DESCRIPTION))]
pub struct MarqueeCli(#[bpaf(external(marquee_args))] pub MarqueeArgs);

/// Main marquee args parser
///
/// To parse the marquee CLI, use [`MarqueeCli`] instead using [`marquee_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct MarqueeArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

impl MarqueeArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        debug!("running command: {:?}", self.command);
        match self.command {
            Commands::Browse(args) => args.handle(config).await,
            Commands::Search(args) => args.handle(config).await,
            Commands::Show(args) => args.handle(config).await,
            Commands::Interactive(args) => args.handle(config).await,
        }
    }
}

#[derive(Bpaf, Clone, Debug)]
enum Commands {
    /// List popular movies
    #[bpaf(command)]
    Browse(#[bpaf(external(browse::browse))] browse::Browse),

    /// Search movies by title
    #[bpaf(command)]
    Search(#[bpaf(external(browse::search))] browse::Search),

    /// Show details of a single movie
    #[bpaf(command)]
    Show(#[bpaf(external(show::show))] show::Show),

    /// Browse page by page, reading commands from stdin
    #[bpaf(command)]
    Interactive(#[bpaf(external(interactive::interactive))] interactive::Interactive),
}

/// Build the catalog client from configuration.
pub(crate) fn catalog_client(config: &Config) -> Result<Arc<CatalogClient>> {
    let client_config = config.catalog_client_config()?;
    let client = CatalogClient::new(client_config).context("Could not create catalog client")?;
    Ok(Arc::new(client))
}

/// Pin the configured movies and those given on the command line.
///
/// Details of all movies are fetched concurrently.
pub(crate) async fn resolve_pins(
    client: &impl ClientTrait,
    config: &Config,
    extra: &[MovieId],
) -> Result<PinStore> {
    let mut ids = config.pinned.clone();
    for id in extra {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }

    if ids.is_empty() {
        return Ok(PinStore::new());
    }

    debug!("resolving {} pinned movies", ids.len());
    let movies = try_join_all(ids.iter().map(|id| client.movie_detail(*id)))
        .await
        .context("Could not fetch pinned movies")?;

    Ok(movies.into_iter().collect())
}
