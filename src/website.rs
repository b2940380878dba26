//! Static HTML page listing a user's movies.

use crate::error::{CatalogError, Result};
use crate::path_utils::sanitize_file_stem;
use crate::storage::Movie;
use chrono::Local;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";
pub const GENERATED_AT_PLACEHOLDER: &str = "__TEMPLATE_GENERATED_AT__";

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/index_template.html");

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_movie_card(movie: &Movie) -> String {
    let title = escape_html(&movie.title);
    let poster = if movie.has_poster() {
        format!(
            r#"<img src="{}" alt="{title} poster">"#,
            escape_html(&movie.poster_url)
        )
    } else {
        format!(r#"<div class="poster-missing">{title}</div>"#)
    };
    let poster = if movie.has_imdb_id() {
        format!(
            r#"<a href="{IMDB_TITLE_URL}{}" target="_blank">{poster}</a>"#,
            escape_html(&movie.imdb_id)
        )
    } else {
        poster
    };
    let note = if movie.note.trim().is_empty() {
        t!("website.no_note").to_string()
    } else {
        movie.note.clone()
    };

    let mut card = String::new();
    let _ = writeln!(card, r#"        <div class="movie-card">"#);
    let _ = writeln!(card, "            {poster}");
    let _ = writeln!(
        card,
        r#"            <div class="movie-note">{}</div>"#,
        escape_html(&note)
    );
    let _ = writeln!(card, "            <h2>{title}</h2>");
    let _ = writeln!(
        card,
        "            <p>{} | &#11088; {}/10</p>",
        movie.year, movie.rating
    );
    let _ = write!(card, "        </div>");
    card
}

pub fn render_site(template: &str, username: &str, movies: &[Movie]) -> String {
    let grid = movies
        .iter()
        .map(render_movie_card)
        .collect::<Vec<_>>()
        .join("\n");
    let page_title = escape_html(&t!("website.page_title", username = username));

    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();

    fill_template(
        template,
        &[
            (TITLE_PLACEHOLDER, page_title.as_str()),
            (GRID_PLACEHOLDER, grid.as_str()),
            (GENERATED_AT_PLACEHOLDER, generated_at.as_str()),
        ],
    )
}

/// Substitutes placeholders in one left-to-right pass over `template`.
/// Inserted values are never scanned again.
pub fn fill_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = substitutions
            .iter()
            .filter_map(|&(placeholder, value)| {
                rest.find(placeholder).map(|at| (at, placeholder, value))
            })
            .min_by_key(|&(at, _, _)| at);
        let Some((at, placeholder, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + placeholder.len()..];
    }
}

pub fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let template = fs::read_to_string(path)?;
            if !template.contains(GRID_PLACEHOLDER) {
                return Err(CatalogError::Config {
                    message: format!(
                        "template {} is missing {GRID_PLACEHOLDER}",
                        path.display()
                    ),
                });
            }
            Ok(template)
        }
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Renders the site into `<output_dir>/<username>_movies.html`.
pub fn generate(
    output_dir: &Path,
    template_path: Option<&Path>,
    username: &str,
    movies: &[Movie],
) -> Result<PathBuf> {
    if movies.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    let template = load_template(template_path)?;
    let html = render_site(&template, username, movies);

    fs::create_dir_all(output_dir)?;
    let output_file = output_dir.join(format!("{}_movies.html", sanitize_file_stem(username)));
    fs::write(&output_file, html)?;
    tracing::info!(path = %output_file.display(), movies = movies.len(), "generated website");
    Ok(output_file)
}
