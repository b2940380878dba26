use crate::config::Config;
use crate::error::CatalogError;
use crate::movies::command;
use crate::movies::session::{Session, SortKey, resolve_user};
use crate::omdb::OmdbSearchHit;
use crate::storage::models::{MAX_RATING, MIN_RATING};
use crate::storage::{MovieFilter, MovieStore, NewMovie, User};
use anyhow::{Context, Result};
use inquire::error::InquireResult;
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Exit,
    List,
    AddFromOmdb,
    AddManual,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    Sorted,
    Histogram,
    Filter,
    Website,
    SwitchUser,
}

impl MenuAction {
    pub const ALL: [MenuAction; 14] = [
        MenuAction::List,
        MenuAction::AddFromOmdb,
        MenuAction::AddManual,
        MenuAction::Delete,
        MenuAction::Update,
        MenuAction::Stats,
        MenuAction::Random,
        MenuAction::Search,
        MenuAction::Sorted,
        MenuAction::Histogram,
        MenuAction::Filter,
        MenuAction::Website,
        MenuAction::SwitchUser,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Exit => t!("menu.exit"),
            MenuAction::List => t!("menu.list"),
            MenuAction::AddFromOmdb => t!("menu.add_omdb"),
            MenuAction::AddManual => t!("menu.add_manual"),
            MenuAction::Delete => t!("menu.delete"),
            MenuAction::Update => t!("menu.update"),
            MenuAction::Stats => t!("menu.stats"),
            MenuAction::Random => t!("menu.random"),
            MenuAction::Search => t!("menu.search"),
            MenuAction::Sorted => t!("menu.sorted"),
            MenuAction::Histogram => t!("menu.histogram"),
            MenuAction::Filter => t!("menu.filter"),
            MenuAction::Website => t!("menu.website"),
            MenuAction::SwitchUser => t!("menu.switch_user"),
        };
        write!(f, "{label}")
    }
}

enum UserChoice {
    Existing(User),
    CreateNew,
}

impl fmt::Display for UserChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserChoice::Existing(user) => write!(f, "{}", user.username),
            UserChoice::CreateNew => write!(f, "{}", t!("users.create_new")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortChoice {
    Rating,
    YearOldest,
    YearNewest,
}

impl SortChoice {
    const ALL: [SortChoice; 3] = [
        SortChoice::Rating,
        SortChoice::YearOldest,
        SortChoice::YearNewest,
    ];

    fn key(self) -> SortKey {
        match self {
            SortChoice::Rating => SortKey::Rating,
            SortChoice::YearOldest => SortKey::Year {
                newest_first: false,
            },
            SortChoice::YearNewest => SortKey::Year { newest_first: true },
        }
    }
}

impl fmt::Display for SortChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortChoice::Rating => t!("sort.option_rating"),
            SortChoice::YearOldest => t!("sort.option_year_oldest"),
            SortChoice::YearNewest => t!("sort.option_year_newest"),
        };
        write!(f, "{label}")
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Maps Esc / Ctrl-C to `None` so sub-prompts return to the menu.
fn ask<T>(result: InquireResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if is_cancel(&err) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Blank input means "no value"; anything else must parse as `T`.
pub fn optional_number<T: FromStr>(input: &str) -> Result<Option<T>, T::Err> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        trimmed.parse().map(Some)
    }
}

pub fn is_valid_rating(rating: f64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

fn required_text(message: &str) -> Result<Option<String>> {
    ask(Text::new(message)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid(t!("validation.required").into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt())
    .map(|value| value.map(|v| v.trim().to_string()))
}

fn optional_rating_text(message: &str) -> Result<Option<Option<f64>>> {
    let input = ask(Text::new(message)
        .with_validator(|input: &str| match optional_number::<f64>(input) {
            Ok(Some(rating)) if !is_valid_rating(rating) => Ok(Validation::Invalid(
                t!("validation.rating_range").into(),
            )),
            Ok(_) => Ok(Validation::Valid),
            Err(_) => Ok(Validation::Invalid(t!("validation.number").into())),
        })
        .prompt())?;
    Ok(input.map(|raw| optional_number::<f64>(&raw).ok().flatten()))
}

fn optional_year_text(message: &str) -> Result<Option<Option<i32>>> {
    let input = ask(Text::new(message)
        .with_validator(|input: &str| match optional_number::<i32>(input) {
            Ok(_) => Ok(Validation::Valid),
            Err(_) => Ok(Validation::Invalid(t!("validation.year").into())),
        })
        .prompt())?;
    Ok(input.map(|raw| optional_number::<i32>(&raw).ok().flatten()))
}

/// Lets the user pick an existing user or create one; `None` if cancelled.
pub fn select_user(store: &mut MovieStore) -> Result<Option<User>> {
    loop {
        let mut options: Vec<UserChoice> = store
            .list_users()?
            .into_iter()
            .map(UserChoice::Existing)
            .collect();
        options.push(UserChoice::CreateNew);

        let Some(choice) = ask(Select::new(&t!("users.select"), options).prompt())? else {
            return Ok(None);
        };

        match choice {
            UserChoice::Existing(user) => {
                println!("{}", t!("users.welcome_back", username = user.username));
                return Ok(Some(user));
            }
            UserChoice::CreateNew => {
                let Some(username) = required_text(&t!("users.new_username"))? else {
                    continue;
                };
                match store.create_user(&username) {
                    Ok(user) => {
                        println!("{}", t!("users.created", username = user.username));
                        return Ok(Some(user));
                    }
                    Err(err @ (CatalogError::UserExists { .. } | CatalogError::EmptyUsername)) => {
                        eprintln!("{}", err.display_localized());
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }
}

fn choose_omdb_hit(hits: &[OmdbSearchHit]) -> crate::error::Result<Option<usize>> {
    let labels: Vec<String> = hits
        .iter()
        .map(|hit| format!("{} ({})", hit.title, hit.year))
        .collect();
    match Select::new(&t!("omdb.choose"), labels).raw_prompt() {
        Ok(option) => Ok(Some(option.index)),
        Err(err) if is_cancel(&err) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn add_from_omdb(session: &mut Session) -> Result<()> {
    let Some(title) = required_text(&t!("prompts.title"))? else {
        return Ok(());
    };
    match session.add_from_omdb(&title, choose_omdb_hit)? {
        Some(movie) => command::print_added(&movie),
        None => println!("{}", t!("omdb.cancelled")),
    }
    Ok(())
}

fn add_manual(session: &mut Session) -> Result<()> {
    let Some(title) = required_text(&t!("prompts.title"))? else {
        return Ok(());
    };
    let Some(year) = ask(CustomType::<i32>::new(&t!("prompts.year"))
        .with_error_message(&t!("validation.year"))
        .prompt())?
    else {
        return Ok(());
    };
    let Some(rating) = ask(CustomType::<f64>::new(&t!("prompts.rating"))
        .with_error_message(&t!("validation.number"))
        .with_validator(|rating: &f64| {
            if is_valid_rating(*rating) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(t!("validation.rating_range").into()))
            }
        })
        .prompt())?
    else {
        return Ok(());
    };
    let Some(note) = ask(Text::new(&t!("prompts.note_optional")).prompt())? else {
        return Ok(());
    };

    let mut movie = NewMovie::manual(title, year, rating);
    movie.note = Some(note.trim().to_string()).filter(|n| !n.is_empty());
    let movie = session.add(&movie)?;
    command::print_added(&movie);
    Ok(())
}

fn delete(session: &mut Session) -> Result<()> {
    let Some(title) = required_text(&t!("prompts.delete_title"))? else {
        return Ok(());
    };
    let confirmed = ask(Confirm::new(&t!("prompts.confirm_delete", title = title))
        .with_default(true)
        .prompt())?;
    if confirmed != Some(true) {
        return Ok(());
    }
    session.delete(&title)?;
    println!("{}", t!("movies.deleted", title = title));
    Ok(())
}

fn update(session: &mut Session) -> Result<()> {
    let Some(title) = required_text(&t!("prompts.title"))? else {
        return Ok(());
    };
    let Some(rating) = optional_rating_text(&t!("prompts.rating_keep"))? else {
        return Ok(());
    };
    let Some(note) = ask(Text::new(&t!("prompts.note_keep")).prompt())? else {
        return Ok(());
    };
    let note = Some(note.trim().to_string()).filter(|n| !n.is_empty());

    session.update(&title, rating, note.as_deref())?;
    println!("{}", t!("movies.updated", title = title));
    Ok(())
}

fn search(session: &mut Session) -> Result<()> {
    let Some(query) = required_text(&t!("prompts.search"))? else {
        return Ok(());
    };
    command::search(session, &query)
}

fn sorted(session: &mut Session) -> Result<()> {
    let Some(choice) = ask(Select::new(&t!("sort.prompt"), SortChoice::ALL.to_vec()).prompt())?
    else {
        return Ok(());
    };
    command::print_sorted(session, choice.key())
}

fn histogram(session: &mut Session) -> Result<()> {
    command::histogram(session, None)?;
    if session.histogram()?.is_empty() {
        return Ok(());
    }
    let Some(name) = ask(Text::new(&t!("prompts.histogram_file")).prompt())? else {
        return Ok(());
    };
    let path = session.save_histogram(Path::new("."), &name)?;
    println!("{}", t!("histogram.saved", path = path.display()));
    Ok(())
}

fn filter(session: &mut Session) -> Result<()> {
    println!("{}", t!("filter.prompt"));
    let Some(min_rating) = optional_rating_text(&t!("prompts.min_rating"))? else {
        return Ok(());
    };
    let Some(min_year) = optional_year_text(&t!("prompts.min_year"))? else {
        return Ok(());
    };
    let Some(max_year) = optional_year_text(&t!("prompts.max_year"))? else {
        return Ok(());
    };
    let filter = MovieFilter {
        min_rating,
        min_year,
        max_year,
    };
    command::print_filtered(session, &filter)
}

fn switch_user(session: &mut Session) -> Result<()> {
    if let Some(user) = select_user(session.store_mut())? {
        session.switch_user(user);
    }
    Ok(())
}

fn handle_action(session: &mut Session, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::Exit => Ok(()),
        MenuAction::List => command::list(session),
        MenuAction::AddFromOmdb => add_from_omdb(session),
        MenuAction::AddManual => add_manual(session),
        MenuAction::Delete => delete(session),
        MenuAction::Update => update(session),
        MenuAction::Stats => command::stats(session),
        MenuAction::Random => command::random(session),
        MenuAction::Search => search(session),
        MenuAction::Sorted => sorted(session),
        MenuAction::Histogram => histogram(session),
        MenuAction::Filter => filter(session),
        MenuAction::Website => {
            let path = session.generate_website()?;
            println!("{}", t!("website.generated", path = path.display()));
            Ok(())
        }
        MenuAction::SwitchUser => switch_user(session),
    }
}

fn report_error(err: &anyhow::Error) {
    let message = err
        .downcast_ref::<CatalogError>()
        .map(CatalogError::display_localized)
        .unwrap_or_else(|| format!("{err:#}"));
    eprintln!("{}", t!("messages.error", error = message));
}

pub fn run_menu(config: Config, mut store: MovieStore, username: Option<&str>) -> Result<()> {
    println!("{}", t!("menu.banner"));

    let user = match username {
        Some(name) => Some(resolve_user(&mut store, Some(name))?),
        None => select_user(&mut store).context(t!("errors.select_user_failed").to_string())?,
    };
    let Some(user) = user else {
        println!("{}", t!("menu.bye"));
        return Ok(());
    };

    let mut session = Session::new(config, store, user);
    loop {
        println!();
        let prompt = t!("menu.prompt", username = session.user().username);
        let action = match Select::new(&prompt, MenuAction::ALL.to_vec())
            .with_page_size(MenuAction::ALL.len())
            .prompt()
        {
            Ok(action) => action,
            Err(err) if is_cancel(&err) => MenuAction::Exit,
            Err(err) => return Err(err.into()),
        };

        if action == MenuAction::Exit {
            println!("{}", t!("menu.bye"));
            return Ok(());
        }

        if let Err(err) = handle_action(&mut session, action) {
            tracing::debug!(error = %err, ?action, "menu action failed");
            report_error(&err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_number() {
        assert_eq!(optional_number::<f64>("  "), Ok(None));
        assert_eq!(optional_number::<f64>(" 7.5 "), Ok(Some(7.5)));
        assert!(optional_number::<i32>("nineteen").is_err());
        assert_eq!(optional_number::<i32>("1999"), Ok(Some(1999)));
    }

    #[test]
    fn test_rating_range() {
        assert!(is_valid_rating(0.0));
        assert!(is_valid_rating(10.0));
        assert!(!is_valid_rating(10.1));
        assert!(!is_valid_rating(-0.5));
    }

    #[test]
    fn test_menu_lists_every_action_once() {
        let labels: Vec<String> = MenuAction::ALL.iter().map(|a| a.to_string()).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Exit));
        assert!(labels.iter().all(|label| !label.starts_with("menu.")));
    }
}
