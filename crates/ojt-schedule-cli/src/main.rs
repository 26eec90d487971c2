//! `ojt-schedule` CLI — compute training end dates and validate trainee schedules.
//!
//! ## Usage
//!
//! ```sh
//! # End date of period 3 starting on a given day
//! ojt-schedule end-date --periods periods.json --period-id 3 --start 2024-01-15
//!
//! # Start defaults to today in the configured timezone
//! OJT_TIMEZONE=Asia/Manila ojt-schedule end-date -p periods.json --period-id 3
//!
//! # Validate a schedule (stdin → stdout), non-zero exit on overlap;
//! # timestamp dates are compared on their calendar day in --timezone
//! cat schedule.json | ojt-schedule validate --locale en-GB --timezone Asia/Colombo
//!
//! # Report every overlapping pair instead of the first
//! ojt-schedule validate -i schedule.json --all
//!
//! # List the available periods
//! ojt-schedule periods -p periods.json
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=debug` for more detail.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use ojt_schedule::dates::parse_timezone;
use ojt_schedule::{
    compute_end_date_with, find_overlaps, parse_calendar_date, parse_schedules, validate, Clock,
    DateLocale, MonthRollover, Period, SystemClock,
};
use serde_json::json;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ojt-schedule",
    version,
    about = "Training-period end dates and schedule overlap checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Short date format for messages (en-US, en-GB, iso)
    #[arg(long, global = true, env = "OJT_LOCALE", default_value = "en-US")]
    locale: String,

    /// IANA timezone for "today" and for reducing timestamps (start and schedule dates) to days
    #[arg(long, global = true, env = "OJT_TIMEZONE", default_value = "UTC")]
    timezone: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the inclusive end date of a training period
    EndDate {
        /// JSON file with the period list
        #[arg(short, long)]
        periods: String,
        /// Id of the selected period
        #[arg(long)]
        period_id: i64,
        /// First day of the assignment (defaults to today)
        #[arg(long)]
        start: Option<String>,
        /// How year/month additions treat short months
        #[arg(long, value_enum, default_value_t = RolloverArg::Overflow)]
        rollover: RolloverArg,
    },
    /// Validate that department schedules do not overlap
    Validate {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Report every overlapping pair instead of the first
        #[arg(long)]
        all: bool,
    },
    /// List periods with their durations
    Periods {
        /// JSON file with the period list
        #[arg(short, long)]
        periods: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RolloverArg {
    Overflow,
    Clamp,
}

impl From<RolloverArg> for MonthRollover {
    fn from(arg: RolloverArg) -> Self {
        match arg {
            RolloverArg::Overflow => MonthRollover::Overflow,
            RolloverArg::Clamp => MonthRollover::Clamp,
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let locale: DateLocale = cli.locale.parse()?;
    let tz = parse_timezone(&cli.timezone)?;

    match cli.command {
        Commands::EndDate {
            periods,
            period_id,
            start,
            rollover,
        } => {
            let periods = read_periods(&periods)?;
            let start = resolve_start(start.as_deref(), tz)?;
            let end = compute_end_date_with(&periods, period_id, start, rollover.into())
                .context("Invalid period or start date")?;
            tracing::info!(%start, %end, period_id, "computed end date");
            println!("{}", end.format("%Y-%m-%d"));
        }
        Commands::Validate { input, output, all } => {
            let raw = read_input(input.as_deref())?;
            let schedules =
                parse_schedules(&raw, Some(tz)).context("Failed to parse schedule JSON")?;

            if all {
                let conflicts = find_overlaps(&schedules);
                let report: Vec<serde_json::Value> = conflicts
                    .iter()
                    .map(|c| json!({ "conflict": c, "message": c.message(locale) }))
                    .collect();
                write_output(output.as_deref(), &serde_json::to_string_pretty(&report)?)?;
                if !conflicts.is_empty() {
                    anyhow::bail!("{} overlapping schedule pair(s)", conflicts.len());
                }
            } else {
                let result = validate(&schedules, locale);
                write_output(output.as_deref(), &serde_json::to_string_pretty(&result)?)?;
                if !result.is_valid {
                    anyhow::bail!("{}", result.message);
                }
            }
        }
        Commands::Periods { periods } => {
            for period in read_periods(&periods)? {
                println!("{}\t{}\t{}", period.id, period.name, period.describe());
            }
        }
    }

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_start(start: Option<&str>, tz: Tz) -> Result<chrono::NaiveDate> {
    match start {
        Some(raw) => parse_calendar_date(raw, tz).context("Invalid period or start date"),
        None => Ok(SystemClock::new(tz).today()),
    }
}

fn read_periods(path: &str) -> Result<Vec<Period>> {
    let raw = read_input(Some(path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse periods in {}", path))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
