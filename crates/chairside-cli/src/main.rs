//! `chairside` CLI — compute free appointment windows from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Free windows for a request read from stdin
//! cat request.json | chairside windows
//!
//! # From file to file, pretty-printed
//! chairside windows -i request.json -o windows.json --pretty
//!
//! # Pin the evaluation instant (otherwise the wall clock is used)
//! chairside --now 2026-03-16T08:00:00Z windows -i request.json
//!
//! # Validate a direct booking against the same rules and bookings
//! chairside check -i request.json --start 2026-03-16T10:00:00Z
//! ```
//!
//! Exit status is 0 on success, 1 on a malformed request, and 2 when `check`
//! rejects the booking.

use anyhow::{Context, Result};
use chairside::{BookingCheck, FreeWindowRequest};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Read};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status for a booking that `check` rejects.
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "chairside",
    version,
    about = "Free appointment window calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Provider timezone used when the request does not name one
    #[arg(long, global = true, env = "CHAIRSIDE_TIMEZONE")]
    timezone: Option<String>,

    /// Evaluation instant (RFC 3339) used when the request does not pin one
    #[arg(long, global = true, env = "CHAIRSIDE_NOW")]
    now: Option<DateTime<Utc>>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute free windows for a JSON request
    Windows {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Check whether an appointment can be booked at a given start
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Requested start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = cli.now.unwrap_or_else(Utc::now);

    match cli.command {
        Commands::Windows {
            input,
            output,
            pretty,
        } => {
            let request = read_request(input.as_deref(), cli.timezone.as_deref())?;
            let windows = request
                .evaluate(now)
                .context("Failed to compute free windows")?;
            info!(date = %request.date, windows = windows.len(), "computed free windows");

            let json = if pretty {
                serde_json::to_string_pretty(&windows)?
            } else {
                serde_json::to_string(&windows)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Check { input, start } => {
            let request = read_request(input.as_deref(), cli.timezone.as_deref())?;
            let check = request.check(start).context("Failed to check booking")?;
            println!("{}", serde_json::to_string(&check)?);

            if check != BookingCheck::Bookable {
                info!(%start, "booking rejected");
                process::exit(EXIT_REJECTED);
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_request(path: Option<&str>, timezone: Option<&str>) -> Result<FreeWindowRequest> {
    let json = read_input(path)?;
    let mut request = FreeWindowRequest::from_json(&json).context("Failed to parse request")?;
    if request.timezone.is_none() {
        request.timezone = timezone.map(str::to_string);
    }
    debug!(
        rules = request.rules.len(),
        booked = request.booked.len(),
        "loaded request"
    );
    Ok(request)
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
