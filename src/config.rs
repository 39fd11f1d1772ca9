//! Runtime configuration for the CLI and the API server.
//!
//! Settings live in a small JSON file. Lookup order for
//! [`load_config_with_fallback`]: explicit path, then the `SOIL_ERP_CONFIG`
//! environment variable, then `soil-erp.json` in the working directory, then
//! built-in defaults.
//!
//! ```json
//! {
//!   "receivables_path": "data/receivables.csv",
//!   "contracts_path": "data/contracts.csv",
//!   "server_addr": "0.0.0.0:3000",
//!   "reference_date": "2025-06-30"
//! }
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "SOIL_ERP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "soil-erp.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub receivables_path: PathBuf,
    pub contracts_path: PathBuf,
    pub server_addr: String,

    /// Pin "today" for reports; None means the local calendar date
    pub reference_date: Option<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            receivables_path: PathBuf::from("data/receivables.csv"),
            contracts_path: PathBuf::from("data/contracts.csv"),
            server_addr: "0.0.0.0:3000".to_string(),
            reference_date: None,
        }
    }
}

impl Config {
    pub fn reference_date_or_today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Loads configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing config JSON in {}", path.display()))?;
    Ok(config)
}

/// Resolves configuration without failing when no file exists.
///
/// An explicitly named file that cannot be read is an error; the env var and
/// default locations are only used when present.
pub fn load_config_with_fallback(path: Option<&Path>) -> Result<Config> {
    if let Some(explicit) = path {
        return load_config(explicit);
    }

    if let Ok(from_env) = std::env::var(CONFIG_ENV_VAR) {
        if !from_env.trim().is_empty() {
            return load_config(from_env.trim());
        }
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        return load_config(default_path);
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}
