//! Kobis-Scraper main entry point
//!
//! This is the command-line interface for the KOBIS scraper.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use kobis_scraper::config::{load_config, Config};
use kobis_scraper::{ImageKind, Kobis};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kobis-Scraper: movie and box-office records from KOBIS
#[derive(Parser, Debug)]
#[command(name = "kobis-scraper")]
#[command(version)]
#[command(about = "Scrapes movie and box-office records from KOBIS", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Daily box office for a date range
    BoxOffice {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day (YYYY-MM-DD), defaults to FROM
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only print this day
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Movie codes by opening year range
    Search {
        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Synopsis of a movie
    Synopsis { code: u32 },

    /// Main poster URL of a movie
    Poster { code: u32 },

    /// Poster or still-cut image URLs of a movie
    Images {
        code: u32,

        #[arg(long, value_enum, default_value_t = ImageArg::Poster)]
        kind: ImageArg,

        /// Thumbnail URLs instead of full-size assets
        #[arg(long)]
        thumbnail: bool,
    },

    /// Credited actors of a movie
    Actors { code: u32 },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImageArg {
    Poster,
    StillCut,
}

impl From<ImageArg> for ImageKind {
    fn from(arg: ImageArg) -> Self {
        match arg {
            ImageArg::Poster => ImageKind::Poster,
            ImageArg::StillCut => ImageKind::StillCut,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let kobis = Kobis::new(&config)?;
    run(&kobis, cli.command, cli.json).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kobis_scraper=info,warn"),
            1 => EnvFilter::new("kobis_scraper=debug,info"),
            2 => EnvFilter::new("kobis_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(kobis: &Kobis, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::BoxOffice { from, to, date } => {
            let box_office = kobis.box_office(from, to.unwrap_or(from)).await?;
            let dates: Vec<NaiveDate> = match date {
                Some(date) => vec![date],
                None => box_office.dates().collect(),
            };

            let mut entries = Vec::new();
            for day in dates {
                entries.extend_from_slice(box_office.get_by_date(day)?);
            }

            print(json, &entries, |entry| {
                format!("{}\t{:>2}\t{}\t{}", entry.date, entry.rank, entry.code, entry.title)
            })
        }
        Command::Search {
            start_year,
            end_year,
            page,
        } => {
            let movies = kobis.search_movies(start_year, end_year, page).await?;
            print(json, &movies, |movie| format!("{}\t{}", movie.code, movie.title))
        }
        Command::Synopsis { code } => {
            let synopsis = kobis.synopsis(code).await?;
            print(json, &[synopsis], |text| text.clone())
        }
        Command::Poster { code } => {
            let url = kobis.main_poster(code).await?;
            print(json, &[url], |url| url.clone())
        }
        Command::Images {
            code,
            kind,
            thumbnail,
        } => {
            let urls = kobis.image_urls(code, kind.into(), thumbnail).await?;
            print(json, &urls, |url| url.clone())
        }
        Command::Actors { code } => {
            let actors = kobis.actor_list(code).await?;
            print(json, &actors, |actor| {
                format!(
                    "{}\t{}\t{}",
                    actor.actor_name,
                    actor.character_name,
                    actor.role_type.label().unwrap_or("-")
                )
            })
        }
    }
}

/// Prints items as a JSON array or one formatted line each
fn print<T: Serialize>(json: bool, items: &[T], line: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        for item in items {
            println!("{}", line(item));
        }
    }
    Ok(())
}
