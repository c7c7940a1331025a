use std::{fs, path::Path};

use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    error::CommandError,
    model::movie::{Catalog, UNAVAILABLE},
};

pub const PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";
pub const FALLBACK_POSTER: &str =
    "https://upload.wikimedia.org/wikipedia/commons/1/14/No_Image_Available.jpg";

// The `.html` suffix turns on tera's autoescaping.
const GRID_TEMPLATE_NAME: &str = "movie_grid.html";
const GRID_TEMPLATE: &str = r#"{% for movie in movies %}
        <li>
            <div class="movie">
                <img class="movie-poster" src="{{ movie.poster }}"/>
                <div class="movie-title">{{ movie.title }}</div>
                <div class="movie-year">{{ movie.release }}</div>
            </div>
        </li>{% endfor %}"#;

#[derive(Serialize)]
struct Card<'a> {
    title: &'a str,
    poster: &'a str,
    release: i32,
}

fn movie_grid(movies: &Catalog) -> Result<String, CommandError> {
    let cards: Vec<Card> = movies
        .iter()
        .map(|(title, movie)| Card {
            title: title.as_str(),
            poster: movie
                .poster
                .as_deref()
                .filter(|p| !p.is_empty() && *p != UNAVAILABLE)
                .unwrap_or(FALLBACK_POSTER),
            release: movie.release,
        })
        .collect();

    let mut tera = Tera::default();
    tera.add_raw_template(GRID_TEMPLATE_NAME, GRID_TEMPLATE)?;

    let mut ctx = Context::new();
    ctx.insert("movies", &cards);
    Ok(tera.render(GRID_TEMPLATE_NAME, &ctx)?)
}

/// Substitutes the movie grid into `template`.
pub fn render(template: &str, movies: &Catalog) -> Result<String, CommandError> {
    if !template.contains(PLACEHOLDER) {
        return Err(CommandError::MissingPlaceholder(PLACEHOLDER));
    }
    Ok(template.replace(PLACEHOLDER, &movie_grid(movies)?))
}

pub fn generate(
    movies: &Catalog,
    template_path: &Path,
    output_path: &Path,
) -> Result<(), CommandError> {
    let template = fs::read_to_string(template_path).map_err(|source| CommandError::Template {
        path: template_path.to_path_buf(),
        source,
    })?;
    let html = render(&template, movies)?;

    let output_err = |source| CommandError::Output {
        path: output_path.to_path_buf(),
        source,
    };
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    fs::write(output_path, html).map_err(output_err)?;

    log::info!(
        "Generated website with {} movies at {}",
        movies.len(),
        output_path.display()
    );
    Ok(())
}
