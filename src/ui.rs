use std::io::{BufRead, Write};

use crate::{app::MovieApp, clients::omdb_client::MovieLookup, error::CommandError};

const MENU: &str = "---
Menu:
 0 - Exit
 1 - List Movies
 2 - Add Movie
 3 - Delete Movie
 4 - Update Movie
 5 - Statistics
 6 - Random Movie
 7 - Search for Movie
 8 - Sorted Movies by Ranking
 9 - Generate Website
---";

/// The numbered text menu, reading one line per prompt from `input`.
pub struct Menu<L: MovieLookup, R: BufRead, W: Write> {
    app: MovieApp<L>,
    input: R,
    output: W,
}

impl<L: MovieLookup, R: BufRead, W: Write> Menu<L, R, W> {
    pub fn new(app: MovieApp<L>, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Runs until the user picks 0 or input ends. Only fatal errors are returned.
    pub async fn run(&mut self) -> Result<(), CommandError> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Please enter your choice: ")? else {
                return self.goodbye();
            };

            let result = match choice.trim() {
                "0" => return self.goodbye(),
                "1" => self.list_movies(),
                "2" => self.add_movie().await,
                "3" => self.delete_movie(),
                "4" => self.update_movie(),
                "5" => self.movie_stats(),
                "6" => self.random_movie(),
                "7" => self.search_movie(),
                "8" => self.sorted_movies(),
                "9" => self.generate_website(),
                other => {
                    log::debug!("Ignoring menu choice '{}'", other);
                    writeln!(self.output, "Invalid choice-number. Please try again.")?;
                    continue;
                }
            };

            if let Err(e) = result {
                if e.is_fatal() {
                    return Err(e);
                }
                log::warn!("Command failed: {}", e);
                writeln!(self.output, "{}. Going back to Menu.", e)?;
            }

            if self.prompt("\nPress Enter to continue.")?.is_none() {
                return self.goodbye();
            }
        }
    }

    fn goodbye(&mut self) -> Result<(), CommandError> {
        writeln!(self.output, "See you next time.. Bye!")?;
        Ok(())
    }

    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, message: &str) -> Result<Option<String>, CommandError> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask(&mut self, message: &str) -> Result<String, CommandError> {
        Ok(self.prompt(message)?.unwrap_or_default())
    }

    fn list_movies(&mut self) -> Result<(), CommandError> {
        let movies = self.app.list();
        writeln!(self.output, "{} Movies in total:", movies.len())?;
        for (title, movie) in &movies {
            writeln!(self.output, "{} ({}): {}", title, movie.release, movie.rating)?;
        }
        Ok(())
    }

    async fn add_movie(&mut self) -> Result<(), CommandError> {
        let query = self.ask("Enter the new Movie: ")?;
        let (title, movie) = self.app.add_movie(&query).await?;
        writeln!(
            self.output,
            "{} (Rating: {}, Released: {}) was successfully added to the db.",
            title, movie.rating, movie.release
        )?;
        Ok(())
    }

    fn delete_movie(&mut self) -> Result<(), CommandError> {
        let title = self.ask("Enter the Movie you want to delete: ")?;
        self.app.delete_movie(&title)?;
        writeln!(self.output, "{} successfully deleted from the database.", title)?;
        Ok(())
    }

    fn update_movie(&mut self) -> Result<(), CommandError> {
        let title = self.ask("Enter the movie you want to update: ")?;
        self.app.ensure_exists(&title)?;
        let input = self.ask(&format!("Enter new rating for '{}' (0-10): ", title))?;
        let rating = self.app.update_movie(&title, &input)?;
        writeln!(
            self.output,
            "'{}' updated successfully with new rating: {}",
            title, rating
        )?;
        Ok(())
    }

    fn movie_stats(&mut self) -> Result<(), CommandError> {
        let stats = self.app.stats()?;
        writeln!(self.output, "Statistics in Movie Ratings:\n")?;
        writeln!(self.output, "Median: {}", stats.median)?;
        writeln!(self.output, "Average: {}", stats.mean)?;
        writeln!(
            self.output,
            "Best movies: {} - Rating: {}",
            stats.best.join(", "),
            stats.best_rating
        )?;
        writeln!(
            self.output,
            "Worst movies: {} - Rating: {}",
            stats.worst.join(", "),
            stats.worst_rating
        )?;
        Ok(())
    }

    fn random_movie(&mut self) -> Result<(), CommandError> {
        let (title, movie) = self.app.random_movie()?;
        writeln!(
            self.output,
            "{} ({}) was randomly picked. Rating: {}",
            title, movie.release, movie.rating
        )?;
        Ok(())
    }

    fn search_movie(&mut self) -> Result<(), CommandError> {
        let query = self.ask("Enter the Movie Name (or a part of it) you are looking for: ")?;
        let found = self.app.search(&query);
        if found.is_empty() {
            writeln!(self.output, "No movies found in the database for {}.", query)?;
        }
        for (title, movie) in found {
            writeln!(
                self.output,
                "{} ({}) was found. Rating: {}",
                title, movie.release, movie.rating
            )?;
        }
        Ok(())
    }

    fn sorted_movies(&mut self) -> Result<(), CommandError> {
        writeln!(self.output, "Movies by Ranking:")?;
        for (title, movie) in self.app.sorted_by_rating() {
            writeln!(self.output, "{} ({}): {}", title, movie.release, movie.rating)?;
        }
        Ok(())
    }

    fn generate_website(&mut self) -> Result<(), CommandError> {
        let output = self.app.generate_website()?;
        writeln!(
            self.output,
            "New website generated successfully at {}!",
            output.display()
        )?;
        Ok(())
    }
}
