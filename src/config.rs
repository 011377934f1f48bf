//! Runtime settings read from `SEEDFINDER_*` environment variables.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::parallel::WorkerPool;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CATALOG_PATH: &str = "data/effects.json";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub catalog_path: PathBuf,
    /// Seed handed to the default roller.
    pub roll_seed: u64,
    pub workers: usize,
    pub static_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            roll_seed: 0,
            workers: 0,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("SEEDFINDER_BIND").unwrap_or(defaults.bind_addr),
            catalog_path: lookup("SEEDFINDER_CATALOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            roll_seed: parse_or_default(lookup("SEEDFINDER_SEED"), "SEEDFINDER_SEED", defaults.roll_seed),
            workers: parse_or_default(lookup("SEEDFINDER_WORKERS"), "SEEDFINDER_WORKERS", defaults.workers),
            static_dir: lookup("SEEDFINDER_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.workers)
    }
}

fn parse_or_default<T>(raw: Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match raw {
        None => default,
        Some(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(variable = name, value = %value, "invalid value, defaulting to {default}");
            default
        }),
    }
}
