use rand::{seq::IteratorRandom, Rng};

use crate::{
    error::CommandError,
    model::movie::{Catalog, Movie},
};

/// Rating statistics over every movie that has a score.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub median: f64,
    pub mean: f64,
    pub best: Vec<String>,
    pub best_rating: f64,
    pub worst: Vec<String>,
    pub worst_rating: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn stats(movies: &Catalog) -> Result<Stats, CommandError> {
    if movies.is_empty() {
        return Err(CommandError::EmptyCatalog);
    }

    let rated: Vec<(&str, f64)> = movies
        .iter()
        .filter_map(|(title, movie)| movie.rating.score().map(|s| (title.as_str(), s)))
        .collect();
    if rated.is_empty() {
        return Err(CommandError::NoRatedMovies);
    }

    let mut scores: Vec<f64> = rated.iter().map(|(_, score)| *score).collect();
    scores.sort_by(f64::total_cmp);

    let n = scores.len();
    let median = if n % 2 == 1 {
        scores[n / 2]
    } else {
        (scores[n / 2 - 1] + scores[n / 2]) / 2.0
    };
    let mean = scores.iter().sum::<f64>() / n as f64;
    let worst_rating = scores[0];
    let best_rating = scores[n - 1];

    let titles_rated = |target: f64| -> Vec<String> {
        rated
            .iter()
            .filter(|(_, score)| *score == target)
            .map(|(title, _)| title.to_string())
            .collect()
    };

    Ok(Stats {
        median: round2(median),
        mean: round2(mean),
        best: titles_rated(best_rating),
        best_rating,
        worst: titles_rated(worst_rating),
        worst_rating,
    })
}

/// Case-insensitive substring match on titles.
pub fn search<'a>(movies: &'a Catalog, query: &str) -> Vec<(&'a String, &'a Movie)> {
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|(title, _)| title.to_lowercase().contains(&needle))
        .collect()
}

/// Every movie, best rated first. Unrated movies come last, ties keep title order.
pub fn sorted_by_rating(movies: &Catalog) -> Vec<(&String, &Movie)> {
    let mut sorted: Vec<_> = movies.iter().collect();
    sorted.sort_by(|(_, a), (_, b)| b.rating.sort_key().total_cmp(&a.rating.sort_key()));
    sorted
}

pub fn random_pick<'a, R: Rng + ?Sized>(
    movies: &'a Catalog,
    rng: &mut R,
) -> Result<(&'a String, &'a Movie), CommandError> {
    movies.iter().choose(rng).ok_or(CommandError::EmptyCatalog)
}
