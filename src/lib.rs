#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod cli;
pub mod config;
pub mod error;
pub mod histogram;
pub mod movies;
pub mod omdb;
pub mod path_utils;
pub mod search;
pub mod stats;
pub mod storage;
pub mod website;

#[cfg(test)]
pub mod test_utils;

pub fn init_locale() {
    let locale = std::env::var(config::ENV_LANG)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(&locale);
}

/// Logs go to stderr so command output stays pipeable.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(config::ENV_LOG)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
