/// Info for this crate, warnings for dependencies, `RUST_LOG` wins when set.
pub fn setup_logging() {
    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("movie_catalog"), log::LevelFilter::Info)
        .format_timestamp(None)
        .format_target(false);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.init();
}
