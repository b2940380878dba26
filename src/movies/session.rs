use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::histogram::RatingHistogram;
use crate::omdb::{OmdbClient, OmdbSearchHit};
use crate::search::{self, SearchOutcome};
use crate::stats::{self, CatalogStats};
use crate::storage::{Movie, MovieFilter, MovieStore, NewMovie, User, UserCatalog};
use crate::website;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    Year { newest_first: bool },
}

/// Picks the user to act as: the named one, or the only user there is.
pub fn resolve_user(store: &mut MovieStore, username: Option<&str>) -> Result<User> {
    if let Some(username) = username {
        return store
            .find_user(username)?
            .ok_or_else(|| CatalogError::UserNotFound {
                username: username.to_string(),
            });
    }

    let mut users = store.list_users()?;
    if users.len() == 1 {
        Ok(users.remove(0))
    } else {
        Err(CatalogError::NoUserSelected)
    }
}

/// The catalog of one user plus what is needed to act on it.
pub struct Session {
    config: Config,
    store: MovieStore,
    user: User,
}

impl Session {
    pub fn new(config: Config, store: MovieStore, user: User) -> Self {
        Self {
            config,
            store,
            user,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn store_mut(&mut self) -> &mut MovieStore {
        &mut self.store
    }

    pub fn switch_user(&mut self, user: User) {
        tracing::debug!(username = %user.username, "switched user");
        self.user = user;
    }

    pub fn list(&mut self) -> Result<Vec<Movie>> {
        self.store.list_movies(self.user.id)
    }

    pub fn add(&mut self, movie: &NewMovie) -> Result<Movie> {
        self.store.add_movie(self.user.id, movie)
    }

    pub fn add_manual(&mut self, title: &str, year: i32, rating: f64) -> Result<Movie> {
        self.add(&NewMovie::manual(title, year, rating))
    }

    /// Looks `title` up on OMDb and stores the chosen hit.
    ///
    /// `choose` is only consulted when OMDb returns several hits; returning
    /// `None` from it abandons the add.
    pub fn add_from_omdb<F>(&mut self, title: &str, choose: F) -> Result<Option<Movie>>
    where
        F: FnOnce(&[OmdbSearchHit]) -> Result<Option<usize>>,
    {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        let api_key = self
            .config
            .omdb_api_key()
            .ok_or(CatalogError::MissingApiKey)?;
        let client = OmdbClient::new(api_key, self.config.omdb_base_url())?;

        let hits = client.search(title)?;
        let selected = if hits.len() > 1 {
            match choose(&hits)? {
                Some(index) => hits.get(index),
                None => return Ok(None),
            }
        } else {
            hits.first()
        };
        let Some(hit) = selected else {
            return Ok(None);
        };

        let metadata = client.details(&hit.imdb_id)?;
        self.add(&metadata.into()).map(Some)
    }

    pub fn delete(&mut self, title: &str) -> Result<()> {
        self.store.delete_movie(self.user.id, title)
    }

    pub fn update(&mut self, title: &str, rating: Option<f64>, note: Option<&str>) -> Result<()> {
        self.store.update_movie(self.user.id, title, rating, note)
    }

    pub fn stats(&mut self) -> Result<Option<CatalogStats>> {
        let entries = self.store.catalog_entries(self.user.id)?;
        Ok(stats::compute(&entries))
    }

    pub fn random(&mut self) -> Result<Option<Movie>> {
        let movies = self.list()?;
        Ok(stats::pick_random(&movies, &mut rand::thread_rng()).cloned())
    }

    pub fn search(&mut self, query: &str) -> Result<SearchOutcome> {
        let mut catalog = UserCatalog::new(&mut self.store, self.user.id);
        search::search_catalog(&mut catalog, query)
    }

    pub fn sorted(&mut self, key: SortKey) -> Result<Vec<Movie>> {
        match key {
            SortKey::Rating => self.store.sorted_by_rating(self.user.id),
            SortKey::Year { newest_first } => self.store.sorted_by_year(self.user.id, newest_first),
        }
    }

    pub fn filter(&mut self, filter: &MovieFilter) -> Result<Vec<Movie>> {
        self.store.filter_movies(self.user.id, filter)
    }

    pub fn histogram(&mut self) -> Result<RatingHistogram> {
        let ratings = self.store.ratings(self.user.id)?;
        Ok(RatingHistogram::from_ratings(&ratings))
    }

    /// Saves the histogram as `<name>.svg`, relative to `dir`.
    pub fn save_histogram(&mut self, dir: &Path, name: &str) -> Result<PathBuf> {
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyFileName);
        }
        let histogram = self.histogram()?;
        if histogram.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        histogram.save_svg(dir, name, &t!("histogram.title"))
    }

    pub fn generate_website(&mut self) -> Result<PathBuf> {
        let movies = self.list()?;
        let template = self.config.site_template();
        website::generate(
            &self.config.site_output_dir(),
            template.as_deref(),
            &self.user.username,
            &movies,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::config::ENV_OMDB_API_KEY;
    use crate::test_utils::TestProcess;
    use tempfile::TempDir;

    fn session(temp: &TempDir) -> Session {
        let config = Config::from_parts(temp.path().to_path_buf(), Settings::default());
        let mut store = MovieStore::in_memory().unwrap();
        let user = store.create_user("alice").unwrap();
        Session::new(config, store, user)
    }

    #[test]
    fn test_resolve_user() {
        let mut store = MovieStore::in_memory().unwrap();
        assert!(matches!(
            resolve_user(&mut store, None),
            Err(CatalogError::NoUserSelected)
        ));

        let alice = store.create_user("alice").unwrap();
        assert_eq!(resolve_user(&mut store, None).unwrap(), alice);

        let bob = store.create_user("bob").unwrap();
        assert!(matches!(
            resolve_user(&mut store, None),
            Err(CatalogError::NoUserSelected)
        ));
        assert_eq!(resolve_user(&mut store, Some("bob")).unwrap(), bob);
        assert!(matches!(
            resolve_user(&mut store, Some("carol")),
            Err(CatalogError::UserNotFound { .. })
        ));
    }

    #[test]
    fn test_search_is_scoped_to_user() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        session.add_manual("Inception", 2010, 8.8).unwrap();

        let bob = session.store_mut().create_user("bob").unwrap();
        session
            .store_mut()
            .add_movie(bob.id, &NewMovie::manual("Interstellar", 2014, 8.6))
            .unwrap();

        let SearchOutcome::Exact(hits) = session.search("in").unwrap() else {
            panic!("expected exact hits");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Inception");

        session.switch_user(bob);
        assert_eq!(session.search("inception").unwrap(), SearchOutcome::NoMatch);
    }

    #[test]
    fn test_stats_and_random_on_empty_catalog() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        assert_eq!(session.stats().unwrap(), None);
        assert_eq!(session.random().unwrap(), None);
        assert!(matches!(
            session.generate_website(),
            Err(CatalogError::EmptyCatalog)
        ));
        assert!(matches!(
            session.save_histogram(temp.path(), "ratings"),
            Err(CatalogError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_save_histogram_requires_name() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        session.add_manual("Heat", 1995, 8.3).unwrap();
        let err = session.save_histogram(temp.path(), "  ").unwrap_err();
        assert!(matches!(err, CatalogError::EmptyFileName));
        assert_eq!(err.display_localized(), "Filename cannot be empty.");
        let path = session.save_histogram(temp.path(), "ratings").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_generate_website_uses_config_dir() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        session.add_manual("Heat", 1995, 8.3).unwrap();
        let path = session.generate_website().unwrap();
        assert_eq!(
            path,
            temp.path().join("generated_site").join("alice_movies.html")
        );
    }

    #[test]
    fn test_add_from_omdb_without_key() {
        let mut process = TestProcess::new();
        process.remove_var(ENV_OMDB_API_KEY);

        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        let result = session.add_from_omdb("Inception", |_| Ok(Some(0)));
        assert!(matches!(result, Err(CatalogError::MissingApiKey)));
        assert!(matches!(
            session.add_from_omdb("  ", |_| Ok(Some(0))),
            Err(CatalogError::EmptyTitle)
        ));
    }
}
