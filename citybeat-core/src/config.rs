//! Configuration at ~/.config/citybeat/config.toml, overridable with `CITYBEAT_*`
//! environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CityBeatError, CityBeatResult};
use crate::filter::TagMatch;
use crate::source::ticketing::{DEFAULT_BASE_URL, DEFAULT_PROVENANCE_TAG};

static DEFAULT_CITY: &str = "San Francisco";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_provenance_tag() -> String {
    DEFAULT_PROVENANCE_TAG.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityBeatConfig {
    /// City passed to the ticketing search
    #[serde(default = "default_city")]
    pub city: String,

    #[serde(default = "default_base_url")]
    pub api_base_url: String,

    /// Bearer token for the ticketing API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tag attached to every ticketing record
    #[serde(default = "default_provenance_tag")]
    pub provenance_tag: String,

    /// Where records are stored. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Text files parsed as manual listings on every refresh
    #[serde(default)]
    pub manual_files: Vec<PathBuf>,

    #[serde(default)]
    pub tag_match: TagMatch,

    /// Skip records already stored under the same identity
    #[serde(default)]
    pub dedupe: bool,
}

impl Default for CityBeatConfig {
    fn default() -> Self {
        CityBeatConfig {
            city: default_city(),
            api_base_url: default_base_url(),
            api_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            provenance_tag: default_provenance_tag(),
            store_path: None,
            manual_files: Vec::new(),
            tag_match: TagMatch::default(),
            dedupe: false,
        }
    }
}

impl CityBeatConfig {
    pub fn config_path() -> CityBeatResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CityBeatError::Config("Could not determine config directory".into()))?
            .join("citybeat");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented default file first if none exists.
    pub fn load() -> CityBeatResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CityBeatResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CITYBEAT"))
            .build()
            .map_err(|e| CityBeatError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CityBeatError::Config(e.to_string()))
    }

    /// The store file, with `~` expanded.
    pub fn store_path(&self) -> CityBeatResult<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(expand(path)),
            None => {
                let data_dir = dirs::data_dir().ok_or_else(|| {
                    CityBeatError::Config("Could not determine data directory".into())
                })?;
                Ok(data_dir.join("citybeat").join("events.jsonl"))
            }
        }
    }

    pub fn manual_files(&self) -> Vec<PathBuf> {
        self.manual_files.iter().map(|p| expand(p)).collect()
    }

    pub fn to_toml(&self) -> CityBeatResult<String> {
        toml::to_string_pretty(self).map_err(|e| CityBeatError::Serialization(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CityBeatResult<()> {
        let contents = format!(
            "\
# citybeat configuration

# City used for the ticketing search:
# city = \"{DEFAULT_CITY}\"

# Ticketing API (token can also come from CITYBEAT_API_TOKEN):
# api_base_url = \"{DEFAULT_BASE_URL}\"
# api_token = \"...\"
# request_timeout_secs = {DEFAULT_TIMEOUT_SECS}
# provenance_tag = \"{DEFAULT_PROVENANCE_TAG}\"

# Where events are stored:
# store_path = \"~/.local/share/citybeat/events.jsonl\"

# Text files with one listing per line, read on every refresh:
# manual_files = [\"~/events.txt\"]

# Tag filtering: \"substring\" or \"exact\":
# tag_match = \"substring\"

# Skip events that are already stored:
# dedupe = false
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CityBeatError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CityBeatError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
