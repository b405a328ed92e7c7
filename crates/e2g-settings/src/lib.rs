//! e2g Settings Crate
//!
//! Handles the drill configuration used by the converter and its
//! persistence in TOML or JSON files.

pub mod config;
pub mod error;

pub use config::{Config, DrillSettings, OutputSettings};
pub use error::{SettingsError, SettingsResult};
