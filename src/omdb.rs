//! Movie metadata lookup against the OMDb HTTP API.

use crate::error::{CatalogError, Result};
use crate::storage::NewMovie;
use crate::storage::models::NOT_AVAILABLE;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OmdbSearchHit {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchHit>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// The fields of an OMDb record the catalog keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: String,
    pub imdb_id: String,
}

impl From<MovieMetadata> for NewMovie {
    fn from(meta: MovieMetadata) -> Self {
        NewMovie {
            title: meta.title,
            year: meta.year,
            rating: meta.rating,
            poster_url: Some(meta.poster_url),
            imdb_id: Some(meta.imdb_id),
            note: None,
        }
    }
}

/// Leading year of values like `2010` or `2008–2013`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// OMDb reports missing ratings as `N/A`; those count as 0.
pub fn parse_rating(raw: Option<&str>) -> f64 {
    raw.filter(|r| *r != NOT_AVAILABLE)
        .and_then(|r| r.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

fn is_success(response: &str) -> bool {
    response.eq_ignore_ascii_case("true")
}

fn is_not_found(error: Option<&str>) -> bool {
    error.is_some_and(|e| e.to_ascii_lowercase().contains("not found"))
}

pub fn parse_search_response(query: &str, body: &str) -> Result<Vec<OmdbSearchHit>> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    if !is_success(&parsed.response) {
        return Err(if is_not_found(parsed.error.as_deref()) {
            CatalogError::OmdbNotFound {
                title: query.to_string(),
            }
        } else {
            CatalogError::Omdb {
                message: parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            }
        });
    }
    if parsed.search.is_empty() {
        return Err(CatalogError::OmdbNotFound {
            title: query.to_string(),
        });
    }
    Ok(parsed.search)
}

pub fn parse_detail_response(imdb_id: &str, body: &str) -> Result<MovieMetadata> {
    let parsed: DetailResponse = serde_json::from_str(body)?;
    if !is_success(&parsed.response) {
        return Err(if is_not_found(parsed.error.as_deref()) {
            CatalogError::OmdbNotFound {
                title: imdb_id.to_string(),
            }
        } else {
            CatalogError::Omdb {
                message: parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            }
        });
    }

    let title = parsed
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| CatalogError::Omdb {
            message: format!("record {imdb_id} has no title"),
        })?;
    let year = parsed
        .year
        .as_deref()
        .and_then(parse_year)
        .ok_or_else(|| CatalogError::Omdb {
            message: format!("record {imdb_id} has no usable year"),
        })?;

    Ok(MovieMetadata {
        title,
        year,
        rating: parse_rating(parsed.imdb_rating.as_deref()),
        poster_url: parsed
            .poster
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        imdb_id: parsed.imdb_id.unwrap_or_else(|| imdb_id.to_string()),
    })
}

pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CatalogError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key,
            base_url: base_url.into(),
            client,
        })
    }

    fn get(&self, params: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }

    pub fn search(&self, title: &str) -> Result<Vec<OmdbSearchHit>> {
        tracing::info!(title, "searching OMDb");
        let body = self.get(&[("s", title), ("type", "movie")])?;
        parse_search_response(title, &body)
    }

    pub fn details(&self, imdb_id: &str) -> Result<MovieMetadata> {
        tracing::info!(imdb_id, "fetching OMDb details");
        let body = self.get(&[("i", imdb_id)])?;
        parse_detail_response(imdb_id, &body)
    }
}
