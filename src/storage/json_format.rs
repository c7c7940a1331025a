use super::CatalogFormat;
use crate::{error::StorageError, model::movie::Catalog};

/// A JSON object mapping each title to `{rating, release, poster}`.
#[derive(Debug)]
pub struct JsonFormat;

impl CatalogFormat for JsonFormat {
    const NAME: &'static str = "JSON";

    fn parse(contents: &str) -> Result<Catalog, StorageError> {
        if contents.trim().is_empty() {
            return Ok(Catalog::new());
        }
        Ok(serde_json::from_str(contents)?)
    }

    fn write(buf: &mut Vec<u8>, movies: &Catalog) -> Result<(), StorageError> {
        serde_json::to_writer_pretty(buf, movies)?;
        Ok(())
    }
}
