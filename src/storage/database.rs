use crate::error::{CatalogError, Result};
use crate::path_utils::safe_parent_for_creation;
use crate::search::{CatalogEntry, CatalogSource};
use crate::storage::models::*;
use crate::storage::schema::{movies, users};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use std::fs;
use std::path::Path;

const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    year INTEGER NOT NULL,
    rating REAL NOT NULL,
    poster_url TEXT NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    imdb_id TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    FOREIGN KEY(user_id) REFERENCES users(id)
);

CREATE UNIQUE INDEX IF NOT EXISTS movies_user_title ON movies (user_id, title);
"#;

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// SQLite-backed store for users and their movies.
pub struct MovieStore {
    conn: SqliteConnection,
}

impl MovieStore {
    /// Opens (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = safe_parent_for_creation(path) {
            fs::create_dir_all(parent)?;
        }
        let database_url = path.to_string_lossy().to_string();
        tracing::debug!(path = %path.display(), "opening movie database");
        Self::establish(&database_url)
    }

    pub fn in_memory() -> Result<Self> {
        Self::establish(":memory:")
    }

    fn establish(database_url: &str) -> Result<Self> {
        let conn = SqliteConnection::establish(database_url)?;
        let mut store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    pub fn create_tables(&mut self) -> Result<()> {
        self.conn.batch_execute(CREATE_TABLES)?;
        Ok(())
    }

    // ====== users ======

    pub fn create_user(&mut self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CatalogError::EmptyUsername);
        }

        diesel::insert_into(users::table)
            .values(&NewUserRow { username })
            .execute(&mut self.conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::UserExists {
                        username: username.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        tracing::info!(username, "created user");

        self.find_user(username)?
            .ok_or_else(|| CatalogError::UserNotFound {
                username: username.to_string(),
            })
    }

    pub fn list_users(&mut self) -> Result<Vec<User>> {
        Ok(users::table
            .select(User::as_select())
            .order(users::id.asc())
            .load(&mut self.conn)?)
    }

    pub fn find_user(&mut self, username: &str) -> Result<Option<User>> {
        Ok(users::table
            .filter(users::username.eq(username.trim()))
            .select(User::as_select())
            .first(&mut self.conn)
            .optional()?)
    }

    // ====== movies ======

    pub fn add_movie(&mut self, user_id: i32, movie: &NewMovie) -> Result<Movie> {
        movie.validate()?;
        let row = NewMovieRow::new(movie, user_id);

        diesel::insert_into(movies::table)
            .values(&row)
            .execute(&mut self.conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CatalogError::MovieExists {
                        title: row.title.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        tracing::info!(user_id, title = row.title, "added movie");

        self.get_movie(user_id, row.title)?
            .ok_or_else(|| CatalogError::MovieNotFound {
                title: row.title.to_string(),
            })
    }

    pub fn get_movie(&mut self, user_id: i32, title: &str) -> Result<Option<Movie>> {
        Ok(movies::table
            .filter(movies::user_id.eq(user_id))
            .filter(movies::title.eq(title.trim()))
            .select(Movie::as_select())
            .first(&mut self.conn)
            .optional()?)
    }

    /// All movies of a user in insertion order.
    pub fn list_movies(&mut self, user_id: i32) -> Result<Vec<Movie>> {
        Ok(movies::table
            .filter(movies::user_id.eq(user_id))
            .select(Movie::as_select())
            .order(movies::id.asc())
            .load(&mut self.conn)?)
    }

    /// Changes the rating and/or note; `None` keeps the current value.
    pub fn update_movie(
        &mut self,
        user_id: i32,
        title: &str,
        rating: Option<f64>,
        note: Option<&str>,
    ) -> Result<()> {
        if rating.is_none() && note.is_none() {
            return Err(CatalogError::NothingToUpdate);
        }
        if let Some(rating) = rating {
            validate_rating(rating)?;
        }

        let title = title.trim();
        let changes = MovieChanges { rating, note };
        let updated = diesel::update(
            movies::table
                .filter(movies::user_id.eq(user_id))
                .filter(movies::title.eq(title)),
        )
        .set(&changes)
        .execute(&mut self.conn)?;

        if updated == 0 {
            return Err(CatalogError::MovieNotFound {
                title: title.to_string(),
            });
        }
        tracing::info!(user_id, title, "updated movie");
        Ok(())
    }

    pub fn delete_movie(&mut self, user_id: i32, title: &str) -> Result<()> {
        let title = title.trim();
        let deleted = diesel::delete(
            movies::table
                .filter(movies::user_id.eq(user_id))
                .filter(movies::title.eq(title)),
        )
        .execute(&mut self.conn)?;

        if deleted == 0 {
            return Err(CatalogError::MovieNotFound {
                title: title.to_string(),
            });
        }
        tracing::info!(user_id, title, "deleted movie");
        Ok(())
    }

    pub fn ratings(&mut self, user_id: i32) -> Result<Vec<f64>> {
        Ok(movies::table
            .filter(movies::user_id.eq(user_id))
            .select(movies::rating)
            .order(movies::id.asc())
            .load(&mut self.conn)?)
    }

    /// Highest rated first; equal ratings keep insertion order.
    pub fn sorted_by_rating(&mut self, user_id: i32) -> Result<Vec<Movie>> {
        Ok(movies::table
            .filter(movies::user_id.eq(user_id))
            .select(Movie::as_select())
            .order((movies::rating.desc(), movies::id.asc()))
            .load(&mut self.conn)?)
    }

    pub fn sorted_by_year(&mut self, user_id: i32, newest_first: bool) -> Result<Vec<Movie>> {
        let query = movies::table
            .filter(movies::user_id.eq(user_id))
            .select(Movie::as_select())
            .into_boxed();
        let query = if newest_first {
            query.order((movies::year.desc(), movies::id.asc()))
        } else {
            query.order((movies::year.asc(), movies::id.asc()))
        };
        Ok(query.load(&mut self.conn)?)
    }

    pub fn filter_movies(&mut self, user_id: i32, filter: &MovieFilter) -> Result<Vec<Movie>> {
        let mut query = movies::table
            .filter(movies::user_id.eq(user_id))
            .select(Movie::as_select())
            .order(movies::id.asc())
            .into_boxed();
        if let Some(min_rating) = filter.min_rating {
            query = query.filter(movies::rating.ge(min_rating));
        }
        if let Some(min_year) = filter.min_year {
            query = query.filter(movies::year.ge(min_year));
        }
        if let Some(max_year) = filter.max_year {
            query = query.filter(movies::year.le(max_year));
        }
        Ok(query.load(&mut self.conn)?)
    }

    pub fn catalog_entries(&mut self, user_id: i32) -> Result<Vec<CatalogEntry>> {
        Ok(movies::table
            .filter(movies::user_id.eq(user_id))
            .select((movies::title, movies::rating))
            .order(movies::id.asc())
            .load::<(String, f64)>(&mut self.conn)?
            .into_iter()
            .map(|(title, rating)| CatalogEntry { title, rating })
            .collect())
    }
}

/// One user's slice of the store, as seen by search.
pub struct UserCatalog<'a> {
    store: &'a mut MovieStore,
    user_id: i32,
}

impl<'a> UserCatalog<'a> {
    pub fn new(store: &'a mut MovieStore, user_id: i32) -> Self {
        Self { store, user_id }
    }
}

impl CatalogSource for UserCatalog<'_> {
    fn fetch_titles_and_ratings(&mut self) -> Result<Vec<CatalogEntry>> {
        self.store.catalog_entries(self.user_id)
    }
}
