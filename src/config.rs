use crate::path_utils::validate_path_str;
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_DIR: &str = "CINELOG_CONFIG_DIR";
pub const ENV_LANG: &str = "CINELOG_LANG";
pub const ENV_LOG: &str = "CINELOG_LOG";
pub const ENV_OMDB_API_KEY: &str = "OMDB_API_KEY";
pub const APP_NAME: &str = "cinelog";
pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_DB_FILE: &str = "movies.db";
pub const DEFAULT_SITE_DIR: &str = "generated_site";
pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";

pub fn resolve_config_dir_with(
    cli_override: Option<&Path>,
    env_override: Option<&str>,
) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        validate_path_str(&path.to_string_lossy())
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir", error = e)))?;
        return Ok(path.to_path_buf());
    }

    if let Some(env_config_dir) = env_override {
        validate_path_str(env_config_dir)
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir_env", error = e)))?;
        return Ok(PathBuf::from(env_config_dir));
    }

    let project_dirs = ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow!(t!("errors.not_find_config_dir")))?;
    Ok(project_dirs.config_dir().to_path_buf())
}

pub fn resolve_config_dir(cli_override: Option<&Path>) -> Result<PathBuf> {
    let env_override = env::var(ENV_CONFIG_DIR).ok();
    resolve_config_dir_with(cli_override, env_override.as_deref())
}

/// Contents of `config.toml`; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Database file; relative paths resolve against the config directory.
    pub database: Option<PathBuf>,
    pub omdb: OmdbSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OmdbSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub output_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

impl Settings {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

pub struct Config {
    config_dir: PathBuf,
    settings: Settings,
}

impl Config {
    pub fn with_config_dir(config_dir_override: Option<&Path>) -> Result<Self> {
        let config_dir = resolve_config_dir(config_dir_override)?;
        fs::create_dir_all(&config_dir)?;
        let settings = Settings::load_from_path(&config_dir.join(CONFIG_FILE))?;

        Ok(Self {
            config_dir,
            settings,
        })
    }

    pub fn from_parts(config_dir: PathBuf, settings: Settings) -> Self {
        Self {
            config_dir,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn in_config_dir(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    pub fn database_path(&self) -> PathBuf {
        match &self.settings.database {
            Some(path) => self.in_config_dir(path),
            None => self.config_dir.join(DEFAULT_DB_FILE),
        }
    }

    /// Key from `config.toml`, falling back to `OMDB_API_KEY`.
    pub fn omdb_api_key(&self) -> Option<String> {
        self.settings
            .omdb
            .api_key
            .clone()
            .or_else(|| env::var(ENV_OMDB_API_KEY).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn omdb_base_url(&self) -> &str {
        self.settings
            .omdb
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OMDB_URL)
    }

    pub fn site_output_dir(&self) -> PathBuf {
        match &self.settings.site.output_dir {
            Some(path) => self.in_config_dir(path),
            None => self.config_dir.join(DEFAULT_SITE_DIR),
        }
    }

    pub fn site_template(&self) -> Option<PathBuf> {
        self.settings
            .site
            .template
            .as_deref()
            .map(|path| self.in_config_dir(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestProcess;
    use std::env;

    #[test]
    fn test_resolve_config_dir_cli_overrides_env() {
        let env_dir = env::temp_dir().join("cinelog_env_dir_resolve");
        let cli_dir = env::temp_dir().join("cinelog_cli_dir_resolve");

        let resolved =
            resolve_config_dir_with(Some(cli_dir.as_path()), env_dir.to_str()).unwrap();
        assert_eq!(resolved, cli_dir);
    }

    #[test]
    fn test_resolve_config_dir_rejects_blank_env() {
        assert!(resolve_config_dir_with(None, Some("  ")).is_err());
    }

    #[test]
    fn test_resolve_config_dir_reads_env_var() {
        let mut process = TestProcess::new();
        let env_dir = env::temp_dir().join("cinelog_env_dir_default");
        process.set_var(ENV_CONFIG_DIR, &env_dir);

        let resolved = resolve_config_dir(None).unwrap();
        assert_eq!(resolved, env_dir);
    }

    #[test]
    fn test_resolve_config_dir_default_path() {
        let mut process = TestProcess::new();
        process.remove_var(ENV_CONFIG_DIR);

        let resolved = resolve_config_dir(None).unwrap();
        let expected = ProjectDirs::from("", "", APP_NAME)
            .unwrap()
            .config_dir()
            .to_path_buf();

        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_settings_paths_resolve_against_config_dir() {
        let settings: Settings = toml::from_str(
            r#"
database = "data/catalog.db"

[site]
output_dir = "/srv/www"
template = "site.html"
"#,
        )
        .unwrap();
        let config = Config::from_parts(PathBuf::from("/home/me/.config/cinelog"), settings);

        assert_eq!(
            config.database_path(),
            PathBuf::from("/home/me/.config/cinelog/data/catalog.db")
        );
        assert_eq!(config.site_output_dir(), PathBuf::from("/srv/www"));
        assert_eq!(
            config.site_template(),
            Some(PathBuf::from("/home/me/.config/cinelog/site.html"))
        );
        assert_eq!(config.omdb_base_url(), DEFAULT_OMDB_URL);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = Config::from_parts(PathBuf::from("/cfg"), Settings::default());
        assert_eq!(config.database_path(), PathBuf::from("/cfg/movies.db"));
        assert_eq!(config.site_output_dir(), PathBuf::from("/cfg/generated_site"));
        assert_eq!(config.site_template(), None);
    }

    #[test]
    fn test_api_key_prefers_config_over_env() {
        let mut process = TestProcess::new();
        process.set_var(ENV_OMDB_API_KEY, "from-env");

        let mut settings = Settings::default();
        let config = Config::from_parts(PathBuf::from("/cfg"), settings.clone());
        assert_eq!(config.omdb_api_key().as_deref(), Some("from-env"));

        settings.omdb.api_key = Some("from-file".to_string());
        let config = Config::from_parts(PathBuf::from("/cfg"), settings);
        assert_eq!(config.omdb_api_key().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<Settings>("databse = \"x.db\"").is_err());
    }
}
