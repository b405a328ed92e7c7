//! Configuration and settings management for e2g
//!
//! Provides the drill parameters used when generating G-code and their
//! persistence. Supports JSON and TOML file formats; the default file lives
//! in the platform configuration directory.
//!
//! Configuration is organized into sections:
//! - Drill settings (spindle, feed, Z heights)
//! - Output settings (number formatting, strict mode)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "e2g";

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Largest accepted fixed precision for coordinates
const MAX_COORDINATE_PRECISION: usize = 10;

/// Drilling parameters applied to every hole
///
/// Heights are in the units selected by the drill file (`M71`/`M72`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    /// Spindle speed (RPM)
    pub spindle_speed: u32,
    /// Feed rate of the drilling cycle (units/min)
    pub feed_rate: f64,
    /// Height for safe travel before the first hole of a tool
    pub safe_z: f64,
    /// Height the drill is lowered to before feeding, also the cycle R-plane
    pub feed_z: f64,
    /// Final depth of every hole
    pub hole_bottom_z: f64,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            spindle_speed: 10000,
            feed_rate: 10.0,
            safe_z: 0.6,
            feed_z: 0.2,
            hole_bottom_z: -0.0725,
        }
    }
}

impl DrillSettings {
    /// Validate drill settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.spindle_speed == 0 {
            return Err(SettingsError::invalid("drill.spindle_speed", "must be > 0"));
        }

        if !self.feed_rate.is_finite() || self.feed_rate <= 0.0 {
            return Err(SettingsError::invalid("drill.feed_rate", "must be > 0"));
        }

        for (key, value) in [
            ("drill.safe_z", self.safe_z),
            ("drill.feed_z", self.feed_z),
            ("drill.hole_bottom_z", self.hole_bottom_z),
        ] {
            if !value.is_finite() {
                return Err(SettingsError::invalid(key, "must be a finite number"));
            }
        }

        if self.safe_z < self.feed_z {
            return Err(SettingsError::invalid(
                "drill.safe_z",
                "must not be below drill.feed_z",
            ));
        }

        if self.hole_bottom_z >= self.feed_z {
            return Err(SettingsError::invalid(
                "drill.hole_bottom_z",
                "must be below drill.feed_z",
            ));
        }

        Ok(())
    }
}

/// Output formatting settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Fixed number of decimals for coordinates and heights.
    /// `None` writes the shortest exact decimal.
    pub coordinate_precision: Option<usize>,
    /// Refuse to write output when any line had a malformed numeric field
    pub strict: bool,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Drill settings
    pub drill: DrillSettings,
    /// Output settings
    pub output: OutputSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the default config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load an explicit config file, or the default one if it exists
    ///
    /// Falls back to built-in defaults when no path is given and no default
    /// file is present.
    pub fn resolve(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => return Err(unsupported(path)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            _ => return Err(unsupported(path)),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.drill.validate()?;

        if let Some(precision) = self.output.coordinate_precision {
            if precision > MAX_COORDINATE_PRECISION {
                return Err(SettingsError::invalid(
                    "output.coordinate_precision",
                    format!("must be at most {}", MAX_COORDINATE_PRECISION),
                ));
            }
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn unsupported(path: &Path) -> SettingsError {
    SettingsError::UnsupportedFormat(format!(
        "{} (config file must be .json or .toml)",
        path.display()
    ))
}
