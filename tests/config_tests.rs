
use cinelog::config::{
    Config, DEFAULT_OMDB_URL, ENV_CONFIG_DIR, ENV_OMDB_API_KEY, Settings, resolve_config_dir,
};
use env_lock::{EnvVarGuard, lock_env};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn cli_override_beats_environment() {
    let _lock = lock_env();
    let temp = TempDir::new().unwrap();
    let _env = EnvVarGuard::set(ENV_CONFIG_DIR, "/tmp/cinelog-from-env");

    let resolved = resolve_config_dir(Some(temp.path())).unwrap();
    assert_eq!(resolved, temp.path());

    let resolved = resolve_config_dir(None).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/cinelog-from-env"));
}

#[test]
fn missing_config_file_uses_defaults() {
    let _lock = lock_env();
    let _key = EnvVarGuard::remove(ENV_OMDB_API_KEY);
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("nested");

    let config = Config::with_config_dir(Some(&config_dir)).unwrap();
    assert!(config_dir.is_dir());
    assert_eq!(config.settings(), &Settings::default());
    assert_eq!(config.database_path(), config_dir.join("movies.db"));
    assert_eq!(config.site_output_dir(), config_dir.join("generated_site"));
    assert_eq!(config.omdb_base_url(), DEFAULT_OMDB_URL);
    assert_eq!(config.omdb_api_key(), None);
    assert_eq!(config.site_template(), None);
}

#[test]
fn config_file_overrides_paths_and_key() {
    let _lock = lock_env();
    let _key = EnvVarGuard::set(ENV_OMDB_API_KEY, "from-env");
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        r#"
database = "catalog.sqlite"

[omdb]
api_key = "from-file"
base_url = "http://localhost:9999/"

[site]
output_dir = "/srv/www"
template = "page.html"
"#,
    )
    .unwrap();

    let config = Config::with_config_dir(Some(temp.path())).unwrap();
    assert_eq!(config.database_path(), temp.path().join("catalog.sqlite"));
    assert_eq!(config.omdb_api_key().as_deref(), Some("from-file"));
    assert_eq!(config.omdb_base_url(), "http://localhost:9999/");
    assert_eq!(config.site_output_dir(), PathBuf::from("/srv/www"));
    assert_eq!(config.site_template(), Some(temp.path().join("page.html")));
}

#[test]
fn unknown_keys_are_rejected() {
    let _lock = lock_env();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "databse = \"typo.db\"\n").unwrap();
    assert!(Config::with_config_dir(Some(temp.path())).is_err());
}
