use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use citybeat_core::ManualTextAdapter;
use citybeat_core::filter::sort_by_date;
use owo_colors::OwoColorize;

use super::{read_stdin, read_text};
use crate::render::print_grouped;

pub fn run(file: Option<PathBuf>, json: bool) -> Result<()> {
    let text = match file {
        Some(path) => read_text(&path)?,
        None => read_stdin()?,
    };

    let today = Local::now().date_naive();
    let records = ManualTextAdapter::new(text, today).records();

    if json {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No listings matched \"<title> — <date> @ <location>\"".dimmed());
        return Ok(());
    }

    let mut ordered: Vec<_> = records.iter().collect();
    sort_by_date(&mut ordered);
    print_grouped(&ordered, today);

    Ok(())
}
