#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

use cinelog::cli;
use cinelog::error::CatalogError;
use cinelog::{init_locale, init_tracing};

fn main() {
    init_locale();
    init_tracing();

    if let Err(e) = cli::run() {
        tracing::debug!(error = ?e, "command failed");
        let message = e
            .downcast_ref::<CatalogError>()
            .map(CatalogError::display_localized)
            .unwrap_or_else(|| format!("{e:#}"));
        eprintln!("{}", t!("messages.error", error = message));
        std::process::exit(1);
    }
}
