use anyhow::{Context, Result};
use bpaf::Bpaf;
use marquee_catalog::{ClientTrait, MovieId};
use tracing::instrument;

use super::catalog_client;
use crate::config::Config;
use crate::utils::display::DisplayMovie;

// Show details of a single movie
#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Print the movie as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Id of the movie, as shown next to its title
    #[bpaf(positional("ID"))]
    pub id: MovieId,
}

impl Show {
    #[instrument(name = "show", fields(id = %self.id), skip_all)]
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = catalog_client(&config)?;
        let movie = client
            .movie_detail(self.id)
            .await
            .with_context(|| format!("Could not fetch movie {}", self.id))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&movie)?);
        } else {
            println!("{}", DisplayMovie(&movie));
        }
        Ok(())
    }
}
