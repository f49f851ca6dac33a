//! Environment configuration with hardcoded defaults
//!
//! Every knob reads from the environment and falls back to a built-in
//! default; CLI flags override both (see `cli`).

use clap::ValueEnum;
use std::path::PathBuf;

use crate::types::{Result, TrackerError};

/// Default listening port
const DEFAULT_PORT: u16 = 3000;

/// Where the current collections come from.
///
/// The original deployment shipped three mutually-exclusive server
/// variants (live scraping / persisted store / hardcoded samples); here
/// they are one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DataSourceMode {
    /// Scrape GMP sources, back listings with the store, sample fallback
    #[default]
    Live,
    /// Skip scraping; serve the store, sample fallback
    Store,
    /// Serve the built-in sample set only
    Sample,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Listing store document path (the optional write-behind mirror)
    pub store_path: PathBuf,
    pub data_source: DataSourceMode,
}

impl Config {
    /// Build configuration from the environment.
    ///
    /// `PORT`, `IPOTRACK_STORE` and `IPOTRACK_DATA_SOURCE` are honored;
    /// anything absent falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| TrackerError::Config(format!("invalid PORT: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let store_path = match std::env::var("IPOTRACK_STORE") {
            Ok(raw) => PathBuf::from(raw),
            Err(_) => default_store_path(),
        };

        let data_source = match std::env::var("IPOTRACK_DATA_SOURCE") {
            Ok(raw) => DataSourceMode::from_str(&raw, true)
                .map_err(|_| TrackerError::Config(format!("invalid IPOTRACK_DATA_SOURCE: {raw}")))?,
            Err(_) => DataSourceMode::default(),
        };

        Ok(Self {
            port,
            store_path,
            data_source,
        })
    }
}

/// Default store path (~/.ipotrack/listings.json), falling back to a
/// relative path when no home directory is resolvable.
fn default_store_path() -> PathBuf {
    match directories::UserDirs::new() {
        Some(dirs) => dirs.home_dir().join(".ipotrack").join("listings.json"),
        None => PathBuf::from(".ipotrack/listings.json"),
    }
}
