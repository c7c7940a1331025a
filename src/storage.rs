use std::{
    fs,
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use crate::{
    error::StorageError,
    model::movie::{Catalog, Movie, Rating},
};

pub mod csv_format;
pub mod json_format;

use csv_format::CsvFormat;
use json_format::JsonFormat;

/// Catalog persistence contract shared by every backend.
///
/// Backends assume a single writer: the whole catalog is held in memory and
/// the backing file is overwritten after every mutation, without locking.
pub trait MovieStorage {
    /// Returns a copy of the full catalog.
    fn list(&self) -> Catalog;

    fn contains(&self, title: &str) -> bool {
        self.list().contains_key(title)
    }

    /// Inserts or overwrites `title`. No validation happens here.
    fn add(
        &mut self,
        title: &str,
        rating: Rating,
        release: i32,
        poster: Option<String>,
    ) -> Result<(), StorageError>;

    fn delete(&mut self, title: &str) -> Result<(), StorageError>;

    /// Replaces the rating of `title`, leaving release and poster untouched.
    fn update(&mut self, title: &str, rating: Rating) -> Result<(), StorageError>;
}

/// On-disk encoding of a whole catalog.
pub trait CatalogFormat {
    const NAME: &'static str;

    fn parse(contents: &str) -> Result<Catalog, StorageError>;

    fn write(buf: &mut Vec<u8>, movies: &Catalog) -> Result<(), StorageError>;
}

pub type JsonStorage = FileStorage<JsonFormat>;
pub type CsvStorage = FileStorage<CsvFormat>;

#[derive(Debug)]
pub struct FileStorage<F: CatalogFormat> {
    path: PathBuf,
    movies: Catalog,
    format: PhantomData<F>,
}

impl<F: CatalogFormat> FileStorage<F> {
    /// Loads the catalog at `path`. A missing file is an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let movies = match fs::read_to_string(&path) {
            Ok(contents) => F::parse(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "No {} catalog at {}, starting empty",
                    F::NAME,
                    path.display()
                );
                Catalog::new()
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };
        log::info!(
            "Loaded {} movies from {} catalog {}",
            movies.len(),
            F::NAME,
            path.display()
        );

        Ok(Self {
            path,
            movies,
            format: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StorageError> {
        let mut buf = Vec::new();
        F::write(&mut buf, &self.movies)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        fs::write(&self.path, buf).map_err(|e| StorageError::io(&self.path, e))?;

        log::debug!(
            "Saved {} movies to {}",
            self.movies.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl<F: CatalogFormat> MovieStorage for FileStorage<F> {
    fn list(&self) -> Catalog {
        self.movies.clone()
    }

    fn contains(&self, title: &str) -> bool {
        self.movies.contains_key(title)
    }

    fn add(
        &mut self,
        title: &str,
        rating: Rating,
        release: i32,
        poster: Option<String>,
    ) -> Result<(), StorageError> {
        self.movies
            .insert(title.to_string(), Movie::new(rating, release, poster));
        self.save()
    }

    fn delete(&mut self, title: &str) -> Result<(), StorageError> {
        if self.movies.remove(title).is_none() {
            return Err(StorageError::NotFound(title.to_string()));
        }
        self.save()
    }

    fn update(&mut self, title: &str, rating: Rating) -> Result<(), StorageError> {
        match self.movies.get_mut(title) {
            Some(movie) => movie.rating = rating,
            None => return Err(StorageError::NotFound(title.to_string())),
        }
        self.save()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageKind {
    /// Pick the backend from the file extension.
    Auto,
    Json,
    Csv,
}

impl StorageKind {
    pub fn resolve(self, path: &Path) -> StorageKind {
        match self {
            StorageKind::Auto => match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("csv") => StorageKind::Csv,
                _ => StorageKind::Json,
            },
            other => other,
        }
    }
}

/// Opens the backend chosen for `path` at startup.
pub fn open_storage(
    kind: StorageKind,
    path: &Path,
) -> Result<Box<dyn MovieStorage>, StorageError> {
    match kind.resolve(path) {
        StorageKind::Csv => Ok(Box::new(CsvStorage::open(path)?)),
        _ => Ok(Box::new(JsonStorage::open(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample<S: MovieStorage>(storage: &mut S) {
        storage
            .add(
                "Inception",
                Rating::Score(8.8),
                2010,
                Some("https://img/inception.jpg".to_string()),
            )
            .unwrap();
        storage
            .add("Obscure Short", Rating::Unavailable, 1931, None)
            .unwrap();
        storage
            .add("Heat, Director's Cut", Rating::Score(8.3), 1995, None)
            .unwrap();
    }

    fn assert_round_trip<F: CatalogFormat>(file_name: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(file_name);

        let mut storage = FileStorage::<F>::open(&path).unwrap();
        sample(&mut storage);

        let reloaded = FileStorage::<F>::open(&path).unwrap();
        assert_eq!(reloaded.list(), storage.list());
        assert_eq!(reloaded.list().len(), 3);
    }

    #[test]
    fn json_round_trips() {
        assert_round_trip::<JsonFormat>("movies.json");
    }

    #[test]
    fn csv_round_trips() {
        assert_round_trip::<CsvFormat>("movies.csv");
    }

    #[test]
    fn missing_file_is_empty_catalog() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::open(dir.path().join("nope.json")).unwrap();
        assert!(storage.list().is_empty());
        assert!(!dir.path().join("nope.json").exists());
    }

    #[test]
    fn list_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut storage = CsvStorage::open(dir.path().join("movies.csv")).unwrap();
        sample(&mut storage);
        assert_eq!(storage.list(), storage.list());
    }

    #[test]
    fn contains_matches_exact_titles() {
        let dir = tempdir().unwrap();
        let mut storage = JsonStorage::open(dir.path().join("movies.json")).unwrap();
        sample(&mut storage);

        assert!(storage.contains("Inception"));
        assert!(!storage.contains("inception"));
        storage.delete("Inception").unwrap();
        assert!(!storage.contains("Inception"));
    }

    #[test]
    fn update_only_touches_rating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let mut storage = JsonStorage::open(&path).unwrap();
        sample(&mut storage);

        storage.update("Inception", Rating::Score(9.5)).unwrap();

        let movie = JsonStorage::open(&path).unwrap().list()["Inception"].clone();
        assert_eq!(movie.rating, Rating::Score(9.5));
        assert_eq!(movie.release, 2010);
        assert_eq!(movie.poster.as_deref(), Some("https://img/inception.jpg"));
    }

    #[test]
    fn delete_removes_title() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        let mut storage = CsvStorage::open(&path).unwrap();
        sample(&mut storage);

        storage.delete("Obscure Short").unwrap();

        assert!(!storage.list().contains_key("Obscure Short"));
        assert!(!CsvStorage::open(&path)
            .unwrap()
            .list()
            .contains_key("Obscure Short"));
    }

    #[test]
    fn deleting_missing_title_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let mut storage = JsonStorage::open(&path).unwrap();
        sample(&mut storage);
        let before = fs::read(&path).unwrap();

        let err = storage.delete("Nonexistent").unwrap_err();

        assert!(matches!(err, StorageError::NotFound(t) if t == "Nonexistent"));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn updating_missing_title_fails() {
        let dir = tempdir().unwrap();
        let mut storage = JsonStorage::open(dir.path().join("movies.json")).unwrap();
        let err = storage.update("Nonexistent", Rating::Score(1.0)).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonStorage::open(&path),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("movies.json");
        let mut storage = JsonStorage::open(&path).unwrap();
        storage.add("Alien", Rating::Score(8.5), 1979, None).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn backend_follows_extension() {
        assert_eq!(
            StorageKind::Auto.resolve(Path::new("data/movies.CSV")),
            StorageKind::Csv
        );
        assert_eq!(
            StorageKind::Auto.resolve(Path::new("data/movies.json")),
            StorageKind::Json
        );
        assert_eq!(
            StorageKind::Csv.resolve(Path::new("movies.json")),
            StorageKind::Csv
        );
    }
}
