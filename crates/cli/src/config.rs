//! Environment configuration for the demo driver.

use std::path::PathBuf;

use stockbook_inventory::{DEFAULT_INVENTORY_PATH, DEFAULT_LOW_STOCK_THRESHOLD};

pub const FILE_VAR: &str = "STOCKBOOK_FILE";
pub const THRESHOLD_VAR: &str = "STOCKBOOK_LOW_STOCK_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub inventory_path: PathBuf,
    pub low_stock_threshold: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let inventory_path = lookup(FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.inventory_path);

        let low_stock_threshold = match lookup(THRESHOLD_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "{THRESHOLD_VAR} is not an integer; using {DEFAULT_LOW_STOCK_THRESHOLD}"
                );
                defaults.low_stock_threshold
            }),
            None => defaults.low_stock_threshold,
        };

        Self {
            inventory_path,
            low_stock_threshold,
        }
    }
}
