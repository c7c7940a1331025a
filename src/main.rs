use clap::Parser;
use movie_catalog::config::Config;

mod logging;

#[tokio::main]
async fn main() {
    logging::setup_logging();

    let config = Config::parse();
    if let Err(e) = movie_catalog::run(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
