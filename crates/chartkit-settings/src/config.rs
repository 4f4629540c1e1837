//! Configuration for the annotation engine and its drawing backend.
//!
//! Supports JSON and TOML files, chosen by extension, stored in the
//! platform config directory by default.
//!
//! Configuration is organized into sections:
//! - Interaction (hit thresholds, hover tolerance, pointer throttle)
//! - Theme (hover/selected/active strokes, grab handle markers)
//! - Backend (drawing service endpoint and timeout)

use std::path::{Path, PathBuf};
use std::time::Duration;

use chartkit_annotations::{EngineSettings, HitThresholds, MarkerStyle, StrokeStyle, VisualTheme};
use chartkit_sync::HttpBackendConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const APP_DIR: &str = "chartkit";
const CONFIG_FILE: &str = "config.toml";

/// Pointer interaction settings, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub hover_px: f64,
    pub click_px: f64,
    /// Threshold for signal markers, hover and click alike.
    pub marker_px: f64,
    pub bounds_tolerance_px: f64,
    pub throttle_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            hover_px: 15.0,
            click_px: 20.0,
            marker_px: 30.0,
            bounds_tolerance_px: 10.0,
            throttle_ms: 16,
        }
    }
}

impl InteractionSettings {
    pub fn thresholds(&self) -> HitThresholds {
        HitThresholds::from_pixels(self.hover_px, self.click_px, self.marker_px)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeSettings {
    pub color: String,
    pub width: f64,
}

impl StrokeSettings {
    fn new(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
        }
    }

    fn to_stroke(&self) -> StrokeStyle {
        StrokeStyle::new(self.color.clone(), self.width)
    }
}

/// Highlight colours and widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub hover: StrokeSettings,
    pub selected: StrokeSettings,
    pub active: StrokeSettings,
    pub marker_size: f64,
    pub marker_color: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let theme = VisualTheme::default();
        Self {
            hover: StrokeSettings::new(&theme.hover.color, theme.hover.width),
            selected: StrokeSettings::new(&theme.selected.color, theme.selected.width),
            active: StrokeSettings::new(&theme.active.color, theme.active.width),
            marker_size: theme.marker.size,
            marker_color: theme.marker.color,
        }
    }
}

impl ThemeSettings {
    pub fn to_visual_theme(&self) -> VisualTheme {
        VisualTheme {
            hover: self.hover.to_stroke(),
            selected: self.selected.to_stroke(),
            active: self.active.to_stroke(),
            marker: MarkerStyle {
                size: self.marker_size,
                color: self.marker_color.clone(),
            },
        }
    }
}

/// Drawing service endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        let config = HttpBackendConfig::default();
        Self {
            base_url: config.base_url,
            timeout_ms: config.timeout.as_millis() as u64,
        }
    }
}

impl BackendSettings {
    pub fn to_backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig::new(self.base_url.clone()).with_timeout(Duration::from_millis(self.timeout_ms))
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interaction: InteractionSettings,
    pub theme: ThemeSettings,
    pub backend: BackendSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string())),
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn is_hex_color(color: &str) -> bool {
    color.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/chartkit/config.toml`.
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| SettingsError::ConfigDirectory("no platform config directory".to_string()))?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the default file, falling back to defaults when it does not exist.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_config_path()?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let i = &self.interaction;
        positive("interaction.hover_px", i.hover_px)?;
        positive("interaction.click_px", i.click_px)?;
        positive("interaction.marker_px", i.marker_px)?;
        if !i.bounds_tolerance_px.is_finite() || i.bounds_tolerance_px < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "interaction.bounds_tolerance_px".to_string(),
                value: i.bounds_tolerance_px.to_string(),
            });
        }

        let t = &self.theme;
        for (key, stroke) in [("theme.hover", &t.hover), ("theme.selected", &t.selected), ("theme.active", &t.active)] {
            positive(&format!("{key}.width"), stroke.width)?;
            if !is_hex_color(&stroke.color) {
                return Err(ConfigError::InvalidSetting {
                    key: format!("{key}.color"),
                    reason: format!("'{}' is not a hex colour", stroke.color),
                });
            }
        }
        positive("theme.marker_size", t.marker_size)?;

        if self.backend.timeout_ms == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "backend.timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if !(self.backend.base_url.starts_with("http://") || self.backend.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                key: "backend.base_url".to_string(),
                reason: "must be an http(s) URL".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_engine_settings(&self) -> EngineSettings {
        EngineSettings {
            thresholds: self.interaction.thresholds(),
            bounds_tolerance: self.interaction.bounds_tolerance_px,
            throttle_interval: Duration::from_millis(self.interaction.throttle_ms),
            theme: self.theme.to_visual_theme(),
        }
    }

    pub fn to_backend_config(&self) -> HttpBackendConfig {
        self.backend.to_backend_config()
    }
}
