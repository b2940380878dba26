use crate::cli::{AddArgs, Commands, FilterArgs, SortArgs, SortByArg, UsersArgs, UsersCommands};
use crate::movies::render;
use crate::movies::session::{Session, SortKey};
use crate::storage::{Movie, MovieFilter, MovieStore, NewMovie};
use anyhow::{Result, bail};
use std::path::Path;

const HISTOGRAM_WIDTH: usize = 40;

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn run(session: &mut Session, command: &Commands) -> Result<()> {
    match command {
        Commands::List => list(session),
        Commands::Add(args) => add(session, args),
        Commands::Delete { title } => {
            session.delete(title)?;
            println!("{}", t!("movies.deleted", title = title.trim()));
            Ok(())
        }
        Commands::Update(args) => {
            session.update(&args.title, args.rating, args.note.as_deref())?;
            println!("{}", t!("movies.updated", title = args.title.trim()));
            Ok(())
        }
        Commands::Stats => stats(session),
        Commands::Random => random(session),
        Commands::Search { query } => search(session, &query.join(" ")),
        Commands::Sort(args) => sort(session, args),
        Commands::Filter(args) => filter(session, args),
        Commands::Histogram(args) => histogram(session, args.output.as_deref()),
        Commands::Website => {
            let path = session.generate_website()?;
            println!("{}", t!("website.generated", path = path.display()));
            Ok(())
        }
        Commands::Menu | Commands::Users(_) => {
            bail!("command is not bound to a single user session")
        }
    }
}

pub fn run_users(store: &mut MovieStore, args: &UsersArgs) -> Result<()> {
    match &args.command {
        UsersCommands::List => {
            let users = store.list_users()?;
            if users.is_empty() {
                println!("{}", t!("users.none"));
            }
            for user in users {
                println!("{}", user.username);
            }
        }
        UsersCommands::Add { username } => {
            let user = store.create_user(username)?;
            println!("{}", t!("users.created", username = user.username));
        }
    }
    Ok(())
}

pub fn list(session: &mut Session) -> Result<()> {
    let movies = session.list()?;
    if movies.is_empty() {
        println!(
            "{}",
            t!("movies.empty", username = session.user().username)
        );
        return Ok(());
    }
    print_lines(&render::movie_listing(&movies));
    Ok(())
}

pub fn print_added(movie: &Movie) {
    println!(
        "{}",
        t!(
            "movies.added",
            title = movie.title,
            year = movie.year,
            rating = movie.rating
        )
    );
}

fn add(session: &mut Session, args: &AddArgs) -> Result<()> {
    let movie = match (args.year, args.rating) {
        (Some(year), Some(rating)) => {
            let mut movie = NewMovie::manual(args.title.as_str(), year, rating);
            movie.note = args.note.clone();
            session.add(&movie)?
        }
        _ => match session.add_from_omdb(&args.title, |_| Ok(Some(0)))? {
            Some(movie) => movie,
            None => {
                println!("{}", t!("omdb.cancelled"));
                return Ok(());
            }
        },
    };
    print_added(&movie);
    Ok(())
}

pub fn stats(session: &mut Session) -> Result<()> {
    match session.stats()? {
        Some(stats) => print_lines(&render::stats_lines(&stats)),
        None => println!("{}", t!("stats.empty")),
    }
    Ok(())
}

pub fn random(session: &mut Session) -> Result<()> {
    match session.random()? {
        Some(movie) => println!(
            "{}",
            t!(
                "movies.random",
                title = movie.title,
                year = movie.year,
                rating = movie.rating
            )
        ),
        None => println!("{}", t!("movies.none_found")),
    }
    Ok(())
}

pub fn search(session: &mut Session, query: &str) -> Result<()> {
    let outcome = session.search(query)?;
    print_lines(&render::search_lines(query, &outcome));
    Ok(())
}

pub fn print_sorted(session: &mut Session, key: SortKey) -> Result<()> {
    let movies = session.sorted(key)?;
    if movies.is_empty() {
        println!("{}", t!("movies.none_found"));
        return Ok(());
    }
    let header = match key {
        SortKey::Rating => t!("sort.by_rating"),
        SortKey::Year { newest_first: true } => t!("sort.by_year_newest"),
        SortKey::Year {
            newest_first: false,
        } => t!("sort.by_year_oldest"),
    };
    println!("{header}");
    print_lines(&render::movie_lines(&movies));
    Ok(())
}

fn sort(session: &mut Session, args: &SortArgs) -> Result<()> {
    let key = match args.by {
        SortByArg::Rating => SortKey::Rating,
        SortByArg::Year => SortKey::Year {
            newest_first: args.newest_first,
        },
    };
    print_sorted(session, key)
}

pub fn print_filtered(session: &mut Session, filter: &MovieFilter) -> Result<()> {
    let movies = session.filter(filter)?;
    if movies.is_empty() {
        println!("{}", t!("filter.none"));
        return Ok(());
    }
    println!("{}", t!("filter.header"));
    print_lines(&render::movie_lines(&movies));
    Ok(())
}

fn filter(session: &mut Session, args: &FilterArgs) -> Result<()> {
    let filter = MovieFilter {
        min_rating: args.min_rating,
        min_year: args.min_year,
        max_year: args.max_year,
    };
    print_filtered(session, &filter)
}

pub fn histogram(session: &mut Session, output: Option<&str>) -> Result<()> {
    let histogram = session.histogram()?;
    if histogram.is_empty() {
        println!("{}", t!("histogram.no_ratings"));
        return Ok(());
    }
    println!("{}", t!("histogram.title"));
    print!("{}", histogram.render_text(HISTOGRAM_WIDTH));

    if let Some(name) = output {
        let path = session.save_histogram(Path::new("."), name)?;
        println!("{}", t!("histogram.saved", path = path.display()));
    }
    Ok(())
}
