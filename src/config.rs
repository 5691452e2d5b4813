//! Configuration for the gati-core daemon
//!
//! Only process-level concerns live here (logging, demo command). Control
//! frequencies and protection constants are compile-time values in
//! [`crate::params`] by design: the timing chain is not runtime-tunable.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level daemon configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

/// Demo drive command staged once at startup of the simulation daemon
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DemoConfig {
    /// Linear velocity to stage (mm/s)
    pub linear_mm_s: i32,
    /// Angular velocity to stage (mdeg/s)
    pub angular_mdeg_s: i32,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Defaults for running the simulation daemon without a config file
    pub fn defaults() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            demo: DemoConfig {
                linear_mm_s: 200,
                angular_mdeg_s: 0,
            },
        }
    }
}
