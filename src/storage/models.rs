use crate::error::{CatalogError, Result};
use crate::storage::schema::{movies, users};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Placeholder OMDb uses for absent fields; also stored for manual entries.
pub const NOT_AVAILABLE: &str = "N/A";

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;
/// Year of the earliest surviving motion picture.
pub const MIN_YEAR: i32 = 1888;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: String,
    pub note: String,
    pub imdb_id: String,
    pub user_id: i32,
}

impl Movie {
    pub fn has_poster(&self) -> bool {
        !self.poster_url.is_empty() && self.poster_url != NOT_AVAILABLE
    }

    pub fn has_imdb_id(&self) -> bool {
        !self.imdb_id.is_empty() && self.imdb_id != NOT_AVAILABLE
    }
}

/// A movie about to be stored for some user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: Option<String>,
    pub imdb_id: Option<String>,
    pub note: Option<String>,
}

impl NewMovie {
    pub fn manual(title: impl Into<String>, year: i32, rating: f64) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster_url: None,
            imdb_id: None,
            note: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        validate_rating(self.rating)?;
        if self.year < MIN_YEAR {
            return Err(CatalogError::InvalidYear { year: self.year });
        }
        Ok(())
    }
}

#[derive(Insertable)]
#[diesel(table_name = movies)]
pub(crate) struct NewMovieRow<'a> {
    pub title: &'a str,
    pub year: i32,
    pub rating: f64,
    pub poster_url: &'a str,
    pub note: &'a str,
    pub imdb_id: &'a str,
    pub user_id: i32,
}

impl<'a> NewMovieRow<'a> {
    pub fn new(movie: &'a NewMovie, user_id: i32) -> Self {
        Self {
            title: movie.title.trim(),
            year: movie.year,
            rating: movie.rating,
            poster_url: movie.poster_url.as_deref().unwrap_or(NOT_AVAILABLE),
            note: movie.note.as_deref().unwrap_or(""),
            imdb_id: movie.imdb_id.as_deref().unwrap_or(NOT_AVAILABLE),
            user_id,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = movies)]
pub(crate) struct MovieChanges<'a> {
    pub rating: Option<f64>,
    pub note: Option<&'a str>,
}

/// Optional bounds for listing movies; `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

pub fn validate_rating(rating: f64) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CatalogError::InvalidRating { rating });
    }
    Ok(())
}
