use crate::config::{Config, resolve_config_dir};
use crate::movies::command;
use crate::movies::interactive;
use crate::movies::session::{Session, resolve_user};
use crate::storage::MovieStore;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration directory for cinelog (default: ~/.config/cinelog)
    #[arg(short = 'C', long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// SQLite database file (default: <config-dir>/movies.db)
    #[arg(long = "db", global = true, env = "CINELOG_DB")]
    pub db: Option<PathBuf>,

    /// User whose catalog to work on
    #[arg(short, long, global = true, env = "CINELOG_USER")]
    pub user: Option<String>,

    /// Print the resolved configuration directory path and exit
    #[arg(long)]
    pub print_config_dir_path: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start the interactive menu (default)
    Menu,
    /// List all movies
    #[command(alias = "ls")]
    List,
    /// Add a movie, from OMDb unless --year and --rating are given
    Add(AddArgs),
    /// Delete a movie by title
    #[command(alias = "rm")]
    Delete {
        title: String,
    },
    /// Change a movie's rating and/or note
    Update(UpdateArgs),
    /// Show rating statistics
    Stats,
    /// Pick a random movie
    Random,
    /// Search movies by title, falling back to approximate matches
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List movies sorted by rating or year
    Sort(SortArgs),
    /// List movies within rating and year bounds
    Filter(FilterArgs),
    /// Show a rating histogram, optionally saving it as SVG
    Histogram(HistogramArgs),
    /// Generate an HTML page of the catalog
    Website,
    /// Manage users
    Users(UsersArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    pub title: String,
    /// Release year (manual entry)
    #[arg(long, requires = "rating")]
    pub year: Option<i32>,
    /// Rating between 0 and 10 (manual entry)
    #[arg(long, requires = "year")]
    pub rating: Option<f64>,
    /// Personal note (manual entry)
    #[arg(long, requires = "year")]
    pub note: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    pub title: String,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortByArg {
    Rating,
    Year,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SortArgs {
    #[arg(long, value_enum, default_value = "rating")]
    pub by: SortByArg,
    /// With --by year, list the latest movies first
    #[arg(long)]
    pub newest_first: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct FilterArgs {
    #[arg(long)]
    pub min_rating: Option<f64>,
    #[arg(long)]
    pub min_year: Option<i32>,
    #[arg(long)]
    pub max_year: Option<i32>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct HistogramArgs {
    /// Save as <OUTPUT>.svg in the current directory
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum UsersCommands {
    /// List users
    List,
    /// Create a user
    Add { username: String },
}

pub fn run() -> Result<()> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> Result<()> {
    if cli.print_config_dir_path {
        let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;
        println!("{}", config_dir.display());
        return Ok(());
    }

    let config = Config::with_config_dir(cli.config_dir.as_deref())?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    let mut store = MovieStore::open(&db_path)
        .with_context(|| t!("errors.open_database", path = db_path.display()).to_string())?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => interactive::run_menu(config, store, cli.user.as_deref()),
        Commands::Users(args) => command::run_users(&mut store, &args),
        other => {
            let user = resolve_user(&mut store, cli.user.as_deref())?;
            let mut session = Session::new(config, store, user);
            command::run(&mut session, &other)
        }
    }
}
