mod commands;
mod input;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kalendi_core::{ExpandOptions, MonthOverflow, WindowFilter, DEFAULT_MAX_OCCURRENCES};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kalendi")]
#[command(version)]
#[command(about = "Expand recurring calendar events, build month grids, and plan reminders")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand templates into the instances starting within a window
    Expand {
        /// JSON file with one event or an array of events ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Window start (YYYY-MM-DD or ISO 8601 date-time)
        #[arg(long)]
        from: String,

        /// Window end, inclusive (a bare date means the end of that day)
        #[arg(long)]
        to: String,

        #[command(flatten)]
        expansion: ExpansionArgs,
    },
    /// Print a one-line summary of each event's recurrence
    Describe {
        /// JSON file with one event or an array of events ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Build the Sunday-first grid for a month with each day's events
    Month {
        /// JSON file with one event or an array of events ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        #[arg(long)]
        year: i32,

        /// Month number, 1-12
        #[arg(long)]
        month: u32,

        /// Selected day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        selected: Option<String>,

        /// Day to mark as today (YYYY-MM-DD); defaults to the system date
        #[arg(long)]
        today: Option<String>,

        #[command(flatten)]
        expansion: ExpansionArgs,
    },
    /// Plan reminders for the instances starting within a window
    Reminders {
        /// JSON file with one event or an array of events ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Reference time; reminders firing at or before it are skipped.
        /// Defaults to the system clock.
        #[arg(long)]
        now: Option<String>,

        /// Window start; defaults to --now
        #[arg(long)]
        from: Option<String>,

        /// Window end; defaults to 30 days after the window start
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        expansion: ExpansionArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct ExpansionArgs {
    /// Occurrence cap for rules with neither a count nor an end date
    #[arg(long, env = "KALENDI_MAX_OCCURRENCES", default_value_t = DEFAULT_MAX_OCCURRENCES)]
    max_occurrences: u32,

    /// Also include occurrences that start before the window but end inside it
    #[arg(long)]
    overlap: bool,

    /// Snap monthly/yearly occurrences to the month's last day instead of
    /// rolling into the next month
    #[arg(long)]
    clamp_month_end: bool,
}

impl From<&ExpansionArgs> for ExpandOptions {
    fn from(args: &ExpansionArgs) -> Self {
        ExpandOptions {
            max_occurrences: args.max_occurrences,
            window_filter: if args.overlap {
                WindowFilter::Overlap
            } else {
                WindowFilter::StartDate
            },
            month_overflow: if args.clamp_month_end {
                MonthOverflow::Clamp
            } else {
                MonthOverflow::Rollover
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Expand {
            input,
            from,
            to,
            expansion,
        } => commands::expand(&input, &from, &to, &(&expansion).into()),
        Commands::Describe { input } => commands::describe(&input),
        Commands::Month {
            input,
            year,
            month,
            selected,
            today,
            expansion,
        } => commands::month(
            &input,
            year,
            month,
            selected.as_deref(),
            today.as_deref(),
            &(&expansion).into(),
        ),
        Commands::Reminders {
            input,
            now,
            from,
            to,
            expansion,
        } => commands::reminders(
            &input,
            now.as_deref(),
            from.as_deref(),
            to.as_deref(),
            &(&expansion).into(),
        ),
    }
}
