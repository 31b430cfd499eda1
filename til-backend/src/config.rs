use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{TilError, TilResult};

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    /// Root of the note tree (`<category>/<slug>.md`)
    pub const DATA_DIR: &str = "TIL_DATA_DIR";
    /// Catalog cache lifetime in seconds
    pub const CACHE_TTL_SECS: &str = "TIL_CACHE_TTL_SECS";
    /// Built web UI. Not served when the directory is missing.
    pub const FRONTEND_DIST: &str = "FRONTEND_DIST";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATA_DIR: &str = "data/til";
    pub const CACHE_TTL_SECS: u64 = 60 * 60;
    pub const FRONTEND_DIST: &str = "frontend/dist";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub cache_ttl: Duration,
    pub frontend_dist: PathBuf,
}

impl Config {
    pub fn from_env() -> TilResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source (tests pass a map).
    fn from_lookup<F>(lookup: F) -> TilResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(env_vars::PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                TilError::InvalidConfig(format!("{} must be a valid port, got {:?}", env_vars::PORT, raw))
            })?,
            None => defaults::PORT,
        };

        let ttl_secs = match lookup(env_vars::CACHE_TTL_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                TilError::InvalidConfig(format!(
                    "{} must be a number of seconds, got {:?}",
                    env_vars::CACHE_TTL_SECS,
                    raw
                ))
            })?,
            None => defaults::CACHE_TTL_SECS,
        };
        if ttl_secs == 0 {
            return Err(TilError::InvalidConfig(format!(
                "{} must be greater than zero",
                env_vars::CACHE_TTL_SECS
            )));
        }

        let data_dir = lookup(env_vars::DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::DATA_DIR.to_string());
        let frontend_dist = lookup(env_vars::FRONTEND_DIST)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::FRONTEND_DIST.to_string());

        Ok(Self {
            port,
            data_dir: PathBuf::from(data_dir),
            cache_ttl: Duration::from_secs(ttl_secs),
            frontend_dist: PathBuf::from(frontend_dist),
        })
    }
}
