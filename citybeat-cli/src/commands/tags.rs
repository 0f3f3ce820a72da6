use anyhow::{Context, Result};
use chrono::Local;
use citybeat_core::filter::available_tags;
use citybeat_core::{CityBeatConfig, DateWindow, EventStore, FilterEngine};
use owo_colors::OwoColorize;

use super::open_store;

pub fn run(when: DateWindow) -> Result<()> {
    let config = CityBeatConfig::load().context("Failed to load configuration")?;
    let records = open_store(&config)?.read_all().context("Failed to read stored events")?;

    let in_window = FilterEngine::new(Local::now().date_naive()).within(&records, when);
    let tags = available_tags(in_window.iter().copied());

    if tags.is_empty() {
        println!("{}", format!("No tagged events ({})", when).dimmed());
        return Ok(());
    }

    for tag in &tags {
        let count = in_window.iter().filter(|r| r.tags().contains(tag)).count();
        println!("{} {}", tag, format!("({})", count).dimmed());
    }

    Ok(())
}
