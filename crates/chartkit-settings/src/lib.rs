//! ChartKit Settings Crate
//!
//! Configuration files for interaction thresholds, highlight theme and the
//! drawing backend endpoint.

pub mod config;
pub mod error;

pub use config::{BackendSettings, Config, InteractionSettings, StrokeSettings, ThemeSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
