use anyhow::{Context, Result};
use chrono::Local;
use citybeat_core::{CityBeatConfig, DateWindow, EventQuery, EventStore, FilterEngine, TagMatch};
use owo_colors::OwoColorize;

use super::open_store;
use crate::render::print_grouped;

pub fn run(when: DateWindow, tags: Vec<String>, exact_tags: bool, json: bool) -> Result<()> {
    let config = CityBeatConfig::load().context("Failed to load configuration")?;
    let records = open_store(&config)?.read_all().context("Failed to read stored events")?;

    let tag_match = if exact_tags { TagMatch::Exact } else { config.tag_match };
    let query = EventQuery::new(when).with_tags(tags).with_tag_match(tag_match);

    let today = Local::now().date_naive();
    let matched = FilterEngine::new(today).apply(&records, &query);

    if json {
        for record in &matched {
            println!("{}", serde_json::to_string(record)?);
        }
        return Ok(());
    }

    if matched.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    print_grouped(&matched, today);
    Ok(())
}
