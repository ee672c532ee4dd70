//! Demo configuration – reads `interlock.toml` from the working directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Thresholds used to configure the demo guards.
///
/// Every field has a default, so a partial (or absent) `interlock.toml` still
/// yields a usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum battery charge (percent) required before motion.
    #[serde(default = "default_min_battery")]
    pub min_battery_percent: f64,

    /// Maximum allowed temperature (°C) for the shutdown interlock.
    #[serde(default = "default_max_temp")]
    pub max_temp_celsius: f64,

    /// Connectivity mode the robot must report before motion.
    #[serde(default = "default_connection")]
    pub required_connection: String,
}

fn default_min_battery() -> f64 {
    20.0
}
fn default_max_temp() -> f64 {
    80.0
}
fn default_connection() -> String {
    "WIFI".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_battery_percent: default_min_battery(),
            max_temp_celsius: default_max_temp(),
            required_connection: default_connection(),
        }
    }
}

impl Config {
    /// Load the configuration from `path`.
    ///
    /// A missing file is not an error – the defaults are returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("interlock.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.min_battery_percent, 20.0);
        assert_eq!(cfg.required_connection, "WIFI");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interlock.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "min_battery_percent = 35.0").unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.min_battery_percent, 35.0);
        assert_eq!(cfg.max_temp_celsius, 80.0);
        assert_eq!(cfg.required_connection, "WIFI");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interlock.toml");
        fs::write(&path, "min_battery_percent = \"not a number\"").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
