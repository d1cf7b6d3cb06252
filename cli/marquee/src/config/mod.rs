use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use log::debug;
use marquee_catalog::{CatalogClientConfig, DEFAULT_CATALOG_URL, MovieId};
use serde::{Deserialize, Serialize};
use serde_with::formats::PreferMany;
use serde_with::{DisplayFromStr, OneOrMany, PickFirst, serde_as};
use thiserror::Error;

/// Name of marquee managed directories
const MARQUEE_DIR_NAME: &str = "marquee";
const MARQUEE_CONFIG_DIR_VAR: &str = "MARQUEE_CONFIG_DIR";
pub const MARQUEE_CONFIG_FILE: &str = "marquee.toml";

#[serde_as]
#[derive(Clone, Debug, Deserialize, Default, Serialize)]
pub struct Config {
    /// Key for the movie catalog API
    pub api_key: Option<String>,

    /// The URL of the catalog instance to use
    // Using a URL here adds an extra trailing slash,
    // so just use a String.
    pub catalog_url: Option<String>,

    /// User agent sent to the catalog
    pub user_agent: Option<String>,

    /// Movies pinned at startup
    // `MARQUEE_PINNED=949` arrives as a single integer,
    // `MARQUEE_PINNED=949,11` as a list of strings.
    #[serde_as(as = "OneOrMany<PickFirst<(_, DisplayFromStr)>, PreferMany>")]
    #[serde(default)]
    pub pinned: Vec<MovieId>,

    /// Directory where marquee loads its configuration file from (default:
    /// `<user config dir>/marquee`)
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Set 'api_key' in {config_file} or export MARQUEE_API_KEY."
    )]
    MissingApiKey { config_file: String },
}

impl Config {
    fn read_raw_config() -> Result<HierarchicalConfig> {
        let config_dir = match env::var(MARQUEE_CONFIG_DIR_VAR) {
            Ok(v) => {
                debug!("`${MARQUEE_CONFIG_DIR_VAR}` set: {v}");
                PathBuf::from(v)
            },
            Err(_) => {
                let config_dir = dirs::config_dir()
                    .context("Could not determine the user configuration directory")?
                    .join(MARQUEE_DIR_NAME);
                debug!("`${MARQUEE_CONFIG_DIR_VAR}` not set, using {config_dir:?}");
                config_dir
            },
        };

        let mut builder = HierarchicalConfig::builder()
            .set_default("catalog_url", DEFAULT_CATALOG_URL)?
            // Config dir is added to the config for completeness;
            // the config file cannot change the config dir.
            .set_override("config_dir", config_dir.to_string_lossy().as_ref())?;

        // read from /etc
        builder = builder.add_source(
            config::File::from(PathBuf::from("/etc").join(MARQUEE_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        // the user's config file
        builder = builder.add_source(
            config::File::from(config_dir.join(MARQUEE_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        // override via env variables
        let marquee_envs = env::vars()
            .filter_map(|(k, v)| k.strip_prefix("MARQUEE_").map(|k| (k.to_owned(), v)))
            .filter(|(k, _)| k != "CONFIG_DIR")
            .collect::<HashMap<_, _>>();

        let builder = builder.add_source(
            Environment::default()
                .source(Some(marquee_envs))
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("pinned"),
        );

        Ok(builder.build()?)
    }

    /// Creates a [Config] from the environment and config file
    pub fn parse() -> Result<Config> {
        let final_config = Self::read_raw_config()?;
        let cli_config: Config = final_config
            .try_deserialize()
            .context("Could not parse config")?;
        Ok(cli_config)
    }

    /// Settings for the catalog client.
    ///
    /// Fails if no api key is configured.
    pub fn catalog_client_config(&self) -> Result<CatalogClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                config_file: self
                    .config_dir
                    .join(MARQUEE_CONFIG_FILE)
                    .display()
                    .to_string(),
            })?;

        Ok(CatalogClientConfig {
            catalog_url: self
                .catalog_url
                .clone()
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            api_key: api_key.to_string(),
            user_agent: self.user_agent.clone(),
            ..CatalogClientConfig::default()
        })
    }
}
