use std::path::{Path, PathBuf};

use crate::{
    catalog_views::{self, Stats},
    clients::omdb_client::MovieLookup,
    error::CommandError,
    model::movie::{Catalog, Movie, Rating},
    storage::MovieStorage,
    website,
};

#[derive(Debug, Clone)]
pub struct SitePaths {
    pub template: PathBuf,
    pub output: PathBuf,
}

/// One storage backend plus the commands built on top of it.
pub struct MovieApp<L: MovieLookup> {
    storage: Box<dyn MovieStorage>,
    lookup: L,
    site: SitePaths,
}

/// Accepts only numbers in `[0, 10]`.
pub fn parse_user_rating(input: &str) -> Result<Rating, CommandError> {
    match input.trim().parse::<f64>() {
        // `+ 0.0` turns -0 into 0
        Ok(score) if (0.0..=10.0).contains(&score) => Ok(Rating::Score(score + 0.0)),
        _ => Err(CommandError::InvalidRating(input.trim().to_string())),
    }
}

impl<L: MovieLookup> MovieApp<L> {
    pub fn new(storage: Box<dyn MovieStorage>, lookup: L, site: SitePaths) -> Self {
        Self {
            storage,
            lookup,
            site,
        }
    }

    pub fn list(&self) -> Catalog {
        self.storage.list()
    }

    pub fn ensure_exists(&self, title: &str) -> Result<(), CommandError> {
        if self.storage.contains(title) {
            Ok(())
        } else {
            Err(CommandError::NotFound(title.to_string()))
        }
    }

    /// Looks `query` up remotely and stores what comes back.
    pub async fn add_movie(&mut self, query: &str) -> Result<(String, Movie), CommandError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CommandError::EmptyTitle);
        }
        if self.storage.contains(query) {
            return Err(CommandError::Duplicate(query.to_string()));
        }

        let details = self.lookup.lookup(query).await?;
        if self.storage.contains(&details.title) {
            return Err(CommandError::Duplicate(details.title));
        }

        self.storage.add(
            &details.title,
            details.rating,
            details.release,
            details.poster.clone(),
        )?;
        log::info!("Added '{}' to the catalog", details.title);

        let movie = Movie::new(details.rating, details.release, details.poster);
        Ok((details.title, movie))
    }

    /// The backend reports a missing title as `NotFound` without touching the file.
    pub fn delete_movie(&mut self, title: &str) -> Result<(), CommandError> {
        self.storage.delete(title)?;
        log::info!("Deleted '{}' from the catalog", title);
        Ok(())
    }

    pub fn update_movie(
        &mut self,
        title: &str,
        rating_input: &str,
    ) -> Result<Rating, CommandError> {
        let rating = parse_user_rating(rating_input)?;
        self.storage.update(title, rating)?;
        log::info!("Updated rating of '{}' to {}", title, rating);
        Ok(rating)
    }

    pub fn stats(&self) -> Result<Stats, CommandError> {
        catalog_views::stats(&self.storage.list())
    }

    pub fn random_movie(&self) -> Result<(String, Movie), CommandError> {
        let movies = self.storage.list();
        let (title, movie) = catalog_views::random_pick(&movies, &mut rand::rng())?;
        Ok((title.clone(), movie.clone()))
    }

    pub fn search(&self, query: &str) -> Vec<(String, Movie)> {
        let movies = self.storage.list();
        catalog_views::search(&movies, query)
            .into_iter()
            .map(|(title, movie)| (title.clone(), movie.clone()))
            .collect()
    }

    pub fn sorted_by_rating(&self) -> Vec<(String, Movie)> {
        let movies = self.storage.list();
        catalog_views::sorted_by_rating(&movies)
            .into_iter()
            .map(|(title, movie)| (title.clone(), movie.clone()))
            .collect()
    }

    /// Renders the gallery and returns where it was written.
    pub fn generate_website(&self) -> Result<&Path, CommandError> {
        website::generate(&self.storage.list(), &self.site.template, &self.site.output)?;
        Ok(&self.site.output)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs};

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::{clients::omdb_client::MovieDetails, error::LookupError, storage::JsonStorage};

    /// Answers every query with a fixed result and counts calls.
    struct StubLookup {
        answer: Result<MovieDetails, &'static str>,
        calls: Cell<usize>,
    }

    impl StubLookup {
        fn found(title: &str, rating: Rating) -> Self {
            Self {
                answer: Ok(MovieDetails {
                    title: title.to_string(),
                    rating,
                    release: 1999,
                    poster: None,
                }),
                calls: Cell::new(0),
            }
        }

        fn missing() -> Self {
            Self {
                answer: Err("Movie not found!"),
                calls: Cell::new(0),
            }
        }
    }

    impl MovieLookup for StubLookup {
        async fn lookup(&self, _query: &str) -> Result<MovieDetails, LookupError> {
            self.calls.set(self.calls.get() + 1);
            self.answer
                .clone()
                .map_err(|msg| LookupError::NotFound(msg.to_string()))
        }
    }

    fn app(lookup: StubLookup) -> (TempDir, MovieApp<StubLookup>) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let mut storage = JsonStorage::open(&path).unwrap();
        storage.add("Alien", Rating::Score(8.5), 1979, None).unwrap();
        let site = SitePaths {
            template: dir.path().join("template.html"),
            output: dir.path().join("index.html"),
        };
        (dir, MovieApp::new(Box::new(storage), lookup, site))
    }

    #[tokio::test]
    async fn add_stores_lookup_result() {
        let (_dir, mut app) = app(StubLookup::found("The Matrix", Rating::Score(8.7)));

        let (title, movie) = app.add_movie("  matrix ").await.unwrap();

        assert_eq!(title, "The Matrix");
        assert_eq!(app.list()["The Matrix"], movie);
    }

    #[tokio::test]
    async fn duplicate_query_skips_lookup() {
        let (dir, mut app) = app(StubLookup::found("Alien", Rating::Score(8.5)));
        let before = fs::read(dir.path().join("movies.json")).unwrap();

        let err = app.add_movie("Alien").await.unwrap_err();

        assert!(matches!(err, CommandError::Duplicate(_)));
        assert_eq!(app.lookup.calls.get(), 0);
        assert_eq!(fs::read(dir.path().join("movies.json")).unwrap(), before);
    }

    #[tokio::test]
    async fn duplicate_canonical_title_is_rejected() {
        let (_dir, mut app) = app(StubLookup::found("Alien", Rating::Score(8.5)));
        let err = app.add_movie("alien").await.unwrap_err();
        assert!(matches!(err, CommandError::Duplicate(t) if t == "Alien"));
        assert_eq!(app.lookup.calls.get(), 1);
    }

    #[tokio::test]
    async fn empty_query_and_failed_lookup_leave_catalog_alone() {
        let (_dir, mut app) = app(StubLookup::missing());

        assert!(matches!(
            app.add_movie("   ").await,
            Err(CommandError::EmptyTitle)
        ));
        assert!(matches!(
            app.add_movie("Nonexistent Film").await,
            Err(CommandError::Lookup(LookupError::NotFound(_)))
        ));
        assert_eq!(app.list().len(), 1);
    }

    #[test]
    fn update_validates_rating() {
        let (_dir, mut app) = app(StubLookup::missing());

        for bad in ["11", "-1", "great", ""] {
            assert!(matches!(
                app.update_movie("Alien", bad),
                Err(CommandError::InvalidRating(_))
            ));
        }
        assert_eq!(app.list()["Alien"].rating, Rating::Score(8.5));

        assert_eq!(app.update_movie("Alien", "10").unwrap(), Rating::Score(10.0));
        assert_eq!(app.list()["Alien"].rating, Rating::Score(10.0));
    }

    #[test]
    fn negative_zero_rating_is_stored_as_zero() {
        let (dir, mut app) = app(StubLookup::missing());

        let rating = app.update_movie("Alien", "-0").unwrap();

        assert_eq!(rating.to_string(), "0");
        let saved = fs::read_to_string(dir.path().join("movies.json")).unwrap();
        assert!(!saved.contains("-0"), "{}", saved);
        assert_eq!(app.list()["Alien"].rating.to_string(), "0");
    }

    #[test]
    fn delete_and_update_report_missing_titles() {
        let (_dir, mut app) = app(StubLookup::missing());
        assert!(matches!(
            app.delete_movie("Jaws"),
            Err(CommandError::NotFound(_))
        ));
        assert!(matches!(
            app.update_movie("Jaws", "5"),
            Err(CommandError::NotFound(_))
        ));

        app.delete_movie("Alien").unwrap();
        assert!(app.list().is_empty());
        assert!(matches!(app.random_movie(), Err(CommandError::EmptyCatalog)));
    }
}
