use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    app::SitePaths,
    clients::omdb_client::{LookupConfig, DEFAULT_ENDPOINT},
    storage::StorageKind,
};

/// Manage a movie catalog kept in a JSON or CSV file.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Catalog file to load and rewrite.
    #[arg(long, env = "MOVIE_CATALOG_STORAGE", default_value = "data/movies.json")]
    pub storage: PathBuf,

    /// Storage backend; `auto` picks CSV for `.csv` files and JSON otherwise.
    #[arg(long, value_enum, default_value_t = StorageKind::Auto)]
    pub format: StorageKind,

    /// OMDb API key, needed only to add movies.
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "OMDB_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Per-request timeout for movie lookups.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, default_value = "html_content/index_template.html")]
    pub template: PathBuf,

    #[arg(long, default_value = "html_content/index.html")]
    pub output: PathBuf,
}

impl Config {
    pub fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn site_paths(&self) -> SitePaths {
        SitePaths {
            template: self.template.clone(),
            output: self.output.clone(),
        }
    }
}
