use anyhow::Result as _Result;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Movie title must not be empty")]
    EmptyTitle,

    #[error("User already exists: {username}")]
    UserExists { username: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("No user selected")]
    NoUserSelected,

    #[error("Movie already exists: {title}")]
    MovieExists { title: String },

    #[error("Movie not found: {title}")]
    MovieNotFound { title: String },

    #[error("Invalid rating: {rating} (expected 0-10)")]
    InvalidRating { rating: f64 },

    #[error("Invalid year: {year}")]
    InvalidYear { year: i32 },

    #[error("Nothing to update")]
    NothingToUpdate,

    #[error("No movies in catalog")]
    EmptyCatalog,

    #[error("OMDb API key is not configured")]
    MissingApiKey,

    #[error("OMDb has no movie matching: {title}")]
    OmdbNotFound { title: String },

    #[error("OMDb Error: {message}")]
    Omdb { message: String },

    #[error("File name must not be empty")]
    EmptyFileName,

    #[error("Config Error: {message}")]
    Config { message: String },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Inquire Error: {0}")]
    Inquire(#[from] inquire::InquireError),

    #[error("Database Error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection Error: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON Parse Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML Parse Error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CatalogError {
    pub fn display_localized(&self) -> String {
        match self {
            CatalogError::EmptyQuery => t!("errors.empty_query").to_string(),
            CatalogError::EmptyUsername => t!("errors.empty_username").to_string(),
            CatalogError::EmptyTitle => t!("errors.empty_title").to_string(),
            CatalogError::EmptyFileName => t!("errors.empty_file_name").to_string(),
            CatalogError::UserExists { username } => {
                t!("errors.user_exists", username = username).to_string()
            }
            CatalogError::UserNotFound { username } => {
                t!("errors.user_not_found", username = username).to_string()
            }
            CatalogError::NoUserSelected => t!("errors.no_user_selected").to_string(),
            CatalogError::MovieExists { title } => {
                t!("errors.movie_exists", title = title).to_string()
            }
            CatalogError::MovieNotFound { title } => {
                t!("errors.movie_not_found", title = title).to_string()
            }
            CatalogError::InvalidRating { rating } => {
                t!("errors.invalid_rating", rating = rating).to_string()
            }
            CatalogError::InvalidYear { year } => t!("errors.invalid_year", year = year).to_string(),
            CatalogError::NothingToUpdate => t!("errors.nothing_to_update").to_string(),
            CatalogError::EmptyCatalog => t!("errors.empty_catalog").to_string(),
            CatalogError::MissingApiKey => t!("errors.missing_api_key").to_string(),
            CatalogError::OmdbNotFound { title } => {
                t!("errors.omdb_not_found", title = title).to_string()
            }
            CatalogError::Config { message } => {
                t!("errors.config_error", message = message).to_string()
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = _Result<T, CatalogError>;
