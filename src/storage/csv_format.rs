use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Deserialize;

use super::CatalogFormat;
use crate::{
    error::StorageError,
    model::movie::{deserialize_release, parse_year, Catalog, Movie, Rating},
};

pub const HEADER: [&str; 4] = ["title", "rating", "release", "poster"];

/// Headered CSV, one movie per line.
#[derive(Debug)]
pub struct CsvFormat;

#[derive(Debug, Deserialize)]
struct CsvRow {
    title: String,
    rating: Rating,
    #[serde(deserialize_with = "deserialize_release")]
    release: i32,
    poster: Option<String>,
}

impl CsvRow {
    fn into_entry(self) -> (String, Movie) {
        (self.title, Movie::new(self.rating, self.release, self.poster))
    }
}

fn to_csvable_array(title: &str, movie: &Movie) -> [String; 4] {
    [
        title.to_string(),
        movie.rating.to_string(),
        movie.release.to_string(),
        movie.poster.clone().unwrap_or_default(),
    ]
}

// Any first line whose release column is not a year is taken as the header.
fn is_header(record: &StringRecord) -> bool {
    record.get(2).map_or(true, |release| parse_year(release).is_none())
}

impl CatalogFormat for CsvFormat {
    const NAME: &'static str = "CSV";

    fn parse(contents: &str) -> Result<Catalog, StorageError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(contents.as_bytes());

        let mut movies = Catalog::new();
        for (line, result) in reader.records().enumerate() {
            let record = result?;
            if line == 0 {
                if is_header(&record) {
                    continue;
                }
                log::warn!("CSV catalog has no header line, reading the first line as a movie");
            }
            let (title, movie) = record.deserialize::<CsvRow>(None)?.into_entry();
            movies.insert(title, movie);
        }
        Ok(movies)
    }

    fn write(buf: &mut Vec<u8>, movies: &Catalog) -> Result<(), StorageError> {
        let mut wrt = WriterBuilder::new().has_headers(false).from_writer(buf);
        wrt.write_record(HEADER)?;
        for (title, movie) in movies {
            wrt.write_record(to_csvable_array(title, movie))?;
        }
        wrt.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
