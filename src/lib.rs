use std::io;

pub mod app;
pub mod catalog_views;
pub mod clients;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod ui;
pub mod website;

use app::MovieApp;
use clients::omdb_client::OmdbClient;
use config::Config;
use error::CommandError;
use ui::Menu;

/// Opens the configured catalog and runs the interactive menu on stdin/stdout.
pub async fn run(config: Config) -> Result<(), CommandError> {
    let storage = storage::open_storage(config.format, &config.storage)?;
    if config.api_key.is_none() {
        log::warn!("No OMDb API key configured, adding movies is disabled");
    }
    let lookup = OmdbClient::new(config.lookup_config())?;
    let app = MovieApp::new(storage, lookup, config.site_paths());

    let mut menu = Menu::new(app, io::stdin().lock(), io::stdout());
    menu.run().await
}
