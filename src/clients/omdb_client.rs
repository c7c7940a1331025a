use std::{future::Future, time::Duration};

use reqwest::{header, Client};
use serde::Deserialize;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    RetryIf,
};

use crate::{
    error::LookupError,
    model::movie::{parse_year, Rating, UNAVAILABLE},
};

pub const DEFAULT_ENDPOINT: &str = "https://www.omdbapi.com/";

/// Everything the lookup needs; nothing is read from globals.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// What the lookup service knows about a title.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub rating: Rating,
    pub release: i32,
    pub poster: Option<String>,
}

pub trait MovieLookup {
    fn lookup(&self, query: &str) -> impl Future<Output = Result<MovieDetails, LookupError>>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: Option<String>,
    error: Option<String>,
    title: Option<String>,
    year: Option<String>,
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

impl OmdbClient {
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        let user_agent = header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }

    pub async fn get_json_for_title(&self, query: &str) -> Result<String, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::NotConfigured)?;

        let retry_strategy = ExponentialBackoff::from_millis(10).map(jitter).take(2);
        RetryIf::spawn(
            retry_strategy,
            || async move { self.get_json_for_title_no_retry(api_key, query).await },
            |e: &LookupError| {
                let transient = e.is_transient();
                if transient {
                    log::debug!("Retrying lookup for '{}' after: {}", query, e);
                }
                transient
            },
        )
        .await
    }

    async fn get_json_for_title_no_retry(
        &self,
        api_key: &str,
        query: &str,
    ) -> Result<String, LookupError> {
        log::debug!("Looking up '{}' at {}", query, self.endpoint);
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("apikey", api_key), ("t", query)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }
        Ok(resp.text().await?)
    }
}

impl MovieLookup for OmdbClient {
    async fn lookup(&self, query: &str) -> Result<MovieDetails, LookupError> {
        let body = self.get_json_for_title(query).await?;
        parse_response(&body)
    }
}

/// Extracts title, rating, year and poster from an OMDb answer.
pub fn parse_response(body: &str) -> Result<MovieDetails, LookupError> {
    let resp: OmdbResponse = serde_json::from_str(body)?;

    if resp
        .response
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("false"))
    {
        return Err(LookupError::NotFound(
            resp.error.unwrap_or_else(|| "Movie not found!".to_string()),
        ));
    }

    let title = resp.title.ok_or(LookupError::MissingField("Title"))?;
    let rating = resp
        .imdb_rating
        .ok_or(LookupError::MissingField("imdbRating"))?;
    let year = resp.year.ok_or(LookupError::MissingField("Year"))?;
    let poster = resp.poster.ok_or(LookupError::MissingField("Poster"))?;

    let rating = rating.parse().unwrap_or_else(|_| {
        log::warn!("Unreadable rating '{}' for '{}'", rating, title);
        Rating::Unavailable
    });
    let release =
        parse_year(&year).ok_or_else(|| LookupError::Unparsable("Year", year.clone()))?;
    let poster = Some(poster).filter(|p| !p.is_empty() && p != UNAVAILABLE);

    Ok(MovieDetails {
        title,
        rating,
        release,
        poster,
    })
}
