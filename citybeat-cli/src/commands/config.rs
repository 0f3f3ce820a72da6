use anyhow::{Context, Result};
use citybeat_core::CityBeatConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = CityBeatConfig::config_path()?;
    let config = CityBeatConfig::load().context("Failed to load configuration")?;

    let mut shown = config.clone();
    if shown.api_token.is_some() {
        shown.api_token = Some("********".to_string());
    }

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Store:   {}", config.store_path()?.display());
    println!();
    println!("{}", "Effective settings".bold());
    for line in shown.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
