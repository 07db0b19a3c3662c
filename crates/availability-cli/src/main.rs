//! `availability` CLI -- compute per-day booking availability from calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Availability for a window, events from a Google Calendar export
//! availability window --start 2025-07-08 --end 2025-07-16 -i events.json
//!
//! # Events piped on stdin, Dutch weekday names, pretty output
//! cat events.json | availability window --start 2025-07-08 --end 2025-07-16 --locale nl_NL --pretty
//!
//! # Re-check a single date before booking it
//! availability date 2025-07-15 -i events.json
//! ```
//!
//! Configuration defaults come from `AVAILABILITY_TIMEZONE`, `AVAILABILITY_LOCALE`
//! and `AVAILABILITY_MAX_WINDOW_DAYS`; flags override them. Logs go to stderr and
//! are filtered by `RUST_LOG`.

use std::io::{self, Read};

use anyhow::{Context, Result};
use availability_engine::config::{parse_locale, parse_timezone};
use availability_engine::event::parse_event_list;
use availability_engine::{
    AvailabilityQuery, AvailabilityService, EngineConfig, EventSource, JsonFileSource,
    StaticSource,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Per-day booking availability from calendar events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Events file: a JSON array or a Google Calendar events.list body (reads stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Reference time zone for timed events, e.g. Europe/Amsterdam
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Locale for weekday names, e.g. en_US or nl_NL
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Availability for every day from --start to --end, both included
    Window {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Last day, YYYY-MM-DD (must be after --start)
        #[arg(long)]
        end: String,
    },
    /// Whether a single day is still free
    Date {
        /// Day to check, YYYY-MM-DD
        date: String,
    },
}

#[derive(Serialize)]
struct DateCheck<'a> {
    date: &'a str,
    available: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.timezone.as_deref(), cli.locale.as_deref())?;
    let source = build_source(cli.input.as_deref())?;
    let service = AvailabilityService::new(source, config);

    let output = match &cli.command {
        Commands::Window { start, end } => {
            let records = service.availability(&AvailabilityQuery::new(start, end))?;
            to_json(&records, cli.pretty)?
        }
        Commands::Date { date } => {
            let available = service.check_date(date)?;
            to_json(
                &DateCheck {
                    date: date.trim(),
                    available,
                },
                cli.pretty,
            )?
        }
    };

    println!("{}", output);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=info,availability_engine=warn", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Environment first, then explicit flags on top.
fn load_config(timezone: Option<&str>, locale: Option<&str>) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env().context("Invalid AVAILABILITY_* environment")?;
    if let Some(tz) = timezone {
        config.reference_zone = parse_timezone(tz)?;
    }
    if let Some(locale) = locale {
        config.locale = parse_locale(locale)?;
    }
    Ok(config)
}

fn build_source(path: Option<&str>) -> Result<Box<dyn EventSource>> {
    match path {
        Some(path) => {
            tracing::debug!(path, "reading events from file");
            Ok(Box::new(JsonFileSource::new(path)))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read events from stdin")?;
            let events = parse_event_list(&buf).context("Failed to parse events JSON")?;
            Ok(Box::new(StaticSource::new(events)))
        }
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
