use cinelog::error::{CatalogError, Result};
use std::io;

#[test]
fn error_messages_name_the_subject() {
    let err = CatalogError::MovieNotFound {
        title: "Heat".to_string(),
    };
    assert!(err.to_string().contains("Movie not found"));
    assert!(err.to_string().contains("Heat"));

    let err = CatalogError::InvalidRating { rating: 11.5 };
    assert!(err.to_string().contains("11.5"));

    let err = CatalogError::Config {
        message: "bad template".to_string(),
    };
    assert!(err.to_string().contains("Config Error"));
}

#[test]
fn io_errors_convert() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "movies.db missing");
    let err: CatalogError = io_error.into();
    assert!(matches!(err, CatalogError::Io(_)));
    assert!(err.to_string().contains("movies.db missing"));
}

#[test]
fn localized_messages_fill_in_arguments() {
    let err = CatalogError::UserExists {
        username: "alice".to_string(),
    };
    assert_eq!(err.display_localized(), "User 'alice' already exists");

    let err = CatalogError::OmdbNotFound {
        title: "Qwertyuiop".to_string(),
    };
    assert!(err.display_localized().contains("Qwertyuiop"));
    assert_eq!(
        CatalogError::EmptyQuery.display_localized(),
        "Search query must not be empty"
    );
}

#[test]
fn result_alias_propagates() {
    fn fails() -> Result<()> {
        Err(CatalogError::NothingToUpdate)
    }
    fn outer() -> Result<()> {
        fails()?;
        Ok(())
    }
    assert!(matches!(outer(), Err(CatalogError::NothingToUpdate)));
}
