use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("'{0}' not found in the catalog")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no OMDb API key configured (set --api-key or OMDB_API_KEY)")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("lookup service answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("response is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("response field '{0}' has an unreadable value '{1}'")]
    Unparsable(&'static str, String),
}

impl LookupError {
    /// Connection problems, timeouts and server-side errors are worth another try.
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::Request(e) => e.is_connect() || e.is_timeout(),
            LookupError::Status(status) => status.is_server_error(),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("please enter a valid movie name")]
    EmptyTitle,

    #[error("'{0}' already exists")]
    Duplicate(String),

    #[error("'{0}' not found in the database")]
    NotFound(String),

    #[error("invalid rating '{0}': must be a number between 0 and 10")]
    InvalidRating(String),

    #[error("the catalog is empty")]
    EmptyCatalog,

    #[error("no movie in the catalog has a rating")]
    NoRatedMovies,

    #[error("failed to fetch movie data: {0}")]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Storage(StorageError),

    #[error("could not read template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template does not contain the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("could not render the movie grid: {0}")]
    Render(#[from] tera::Error),

    #[error("could not write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

impl From<StorageError> for CommandError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(title) => CommandError::NotFound(title),
            other => CommandError::Storage(other),
        }
    }
}

impl CommandError {
    /// A failed save leaves memory and disk out of sync, so the session must end.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Storage(_) | CommandError::Terminal(_))
    }
}
