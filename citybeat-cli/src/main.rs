mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use citybeat_core::DateWindow;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "citybeat")]
#[command(version)]
#[command(about = "Collect local event listings and browse them by date and tag")]
struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch from the ticketing API and manual listings, and store the results
    Refresh {
        /// Text file with one listing per line (repeatable)
        #[arg(short, long)]
        manual: Vec<PathBuf>,

        /// Also read listings from stdin
        #[arg(long)]
        stdin: bool,

        /// Skip the ticketing API
        #[arg(long)]
        no_api: bool,

        /// Fail the whole run if the ticketing API can't be reached
        #[arg(long)]
        strict: bool,

        /// Don't store events that are already stored
        #[arg(long)]
        dedupe: bool,
    },
    /// Parse manual listings and print them without storing
    Parse {
        /// File to parse (reads stdin if omitted)
        file: Option<PathBuf>,

        /// Print records as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List stored events
    List {
        /// all, today, this-weekend or this-month
        #[arg(short, long, default_value = "all")]
        when: DateWindow,

        /// Only events with this tag (repeatable, any tag matches)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Match tags exactly instead of by substring
        #[arg(long)]
        exact_tags: bool,

        /// Print records as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Show the tags available for a date window
    Tags {
        #[arg(short, long, default_value = "all")]
        when: DateWindow,
    },
    /// Show config and store locations
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Refresh {
            manual,
            stdin,
            no_api,
            strict,
            dedupe,
        } => {
            commands::refresh::run(commands::refresh::RefreshArgs {
                manual,
                stdin,
                no_api,
                strict,
                dedupe,
            })
            .await
        }
        Commands::Parse { file, json } => commands::parse::run(file, json),
        Commands::List {
            when,
            tag,
            exact_tags,
            json,
        } => commands::list::run(when, tag, exact_tags, json),
        Commands::Tags { when } => commands::tags::run(when),
        Commands::Config => commands::config::run(),
    }
}

/// Logs go to stderr so listings on stdout stay pipeable. RUST_LOG wins over -v.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "citybeat_core=warn,citybeat_cli=warn",
        1 => "citybeat_core=debug,citybeat_cli=debug",
        _ => "citybeat_core=trace,citybeat_cli=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
