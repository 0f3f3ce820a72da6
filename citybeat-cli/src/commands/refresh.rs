use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use citybeat_core::ingest::{IngestOptions, ingest};
use citybeat_core::{CityBeatConfig, ManualTextAdapter, SourceAdapter, TicketingAdapter};
use owo_colors::OwoColorize;
use tracing::info;

use super::{open_store, read_stdin, read_text};
use crate::utils::tui;

pub struct RefreshArgs {
    pub manual: Vec<PathBuf>,
    pub stdin: bool,
    pub no_api: bool,
    pub strict: bool,
    pub dedupe: bool,
}

pub async fn run(args: RefreshArgs) -> Result<()> {
    let config = CityBeatConfig::load().context("Failed to load configuration")?;
    let now = Local::now().naive_local();
    let today = now.date();

    let mut adapters = Vec::new();

    if !args.no_api {
        adapters.push(SourceAdapter::Ticketing(TicketingAdapter::from_config(&config)));
    }

    for path in config.manual_files().into_iter().chain(args.manual) {
        let text = read_text(&path)?;
        info!(path = %path.display(), "adding manual listings");
        adapters.push(SourceAdapter::Manual(ManualTextAdapter::new(text, today)));
    }

    if args.stdin {
        adapters.push(SourceAdapter::Manual(ManualTextAdapter::new(read_stdin()?, today)));
    }

    if adapters.is_empty() {
        anyhow::bail!(
            "Nothing to refresh.\n\n\
            Drop --no-api, or pass listings with:\n  \
            citybeat refresh --manual events.txt"
        );
    }

    let options = IngestOptions {
        strict: args.strict,
        dedupe: args.dedupe || config.dedupe,
    };

    let mut store = open_store(&config)?;

    let spinner = tui::create_spinner("Collecting events");
    let result = ingest(&adapters, &mut store, now, options).await;
    spinner.finish_and_clear();

    let report = result.context("Refresh aborted")?;

    for failure in &report.failures {
        eprintln!(
            "{} skipped {}: {}",
            "warning:".yellow(),
            failure.source,
            failure.error
        );
    }

    let skipped = report.collected - report.stored;
    if skipped > 0 {
        println!(
            "{}",
            format!("Stored {} events ({} already stored)", report.stored, skipped).green()
        );
    } else {
        println!("{}", format!("Stored {} events", report.stored).green());
    }

    Ok(())
}
