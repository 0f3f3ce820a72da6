pub mod config;
pub mod list;
pub mod parse;
pub mod refresh;
pub mod tags;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use citybeat_core::{CityBeatConfig, JsonlStore};

pub fn open_store(config: &CityBeatConfig) -> Result<JsonlStore> {
    let path = config.store_path().context("Could not resolve the event store path")?;
    Ok(JsonlStore::new(path))
}

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read listings from stdin")?;
    Ok(text)
}
