//! Configuration and settings management for JDRKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Document defaults (storage unit, marker reference size)
//! - Canvas preferences (component scale, magnification, grid)
//! - Export defaults (format, precision, pretty printing)

use jdrkit_core::Unit;
use jdrkit_designer::DrawContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Output format written by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Svg,
    Eps,
    Pgf,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Eps => "eps",
            Self::Pgf => "tex",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Eps => write!(f, "eps"),
            Self::Pgf => write!(f, "pgf"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "eps" => Ok(Self::Eps),
            "pgf" | "tex" => Ok(Self::Pgf),
            other => Err(SettingsError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Document defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Unit new drawings store their coordinates in
    #[serde(default)]
    pub storage_unit: Unit,
    /// Reference size for arrows and markers, in bp
    pub normalize_size: f64,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            storage_unit: Unit::Bp,
            normalize_size: 10.0,
        }
    }
}

/// Canvas preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Component pixels per bp at magnification 1
    pub pixels_per_bp: f64,
    pub magnification: f64,
    /// Minor grid lines per major division
    ///
    /// Stored signed so a negative value in a hand-edited file is reported
    /// by [`Config::validate`] instead of failing to parse.
    pub grid_subdivisions: i64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            pixels_per_bp: 1.0,
            magnification: 1.0,
            grid_subdivisions: 1,
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub format: ExportFormat,
    /// Decimal digits written for coordinates
    pub precision: usize,
    #[serde(default)]
    pub svg_pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Svg,
            precision: 4,
            svg_pretty: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentSettings,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<config dir>/jdrkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("jdrkit").join("config.toml"))
            .ok_or_else(|| SettingsError::ConfigDirectory("no configuration directory on this platform".to_string()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match FileFormat::of(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.document.normalize_size > 0.0) {
            return Err(SettingsError::invalid("document.normalize_size", "must be > 0"));
        }

        if !(self.canvas.pixels_per_bp > 0.0) {
            return Err(SettingsError::invalid("canvas.pixels_per_bp", "must be > 0"));
        }

        if !(self.canvas.magnification > 0.0) {
            return Err(SettingsError::invalid("canvas.magnification", "must be > 0"));
        }

        if self.canvas.grid_subdivisions < 1 || self.canvas.grid_subdivisions > i64::from(u32::MAX) {
            return Err(SettingsError::invalid(
                "canvas.grid_subdivisions",
                format!("must be at least 1, got {}", self.canvas.grid_subdivisions),
            ));
        }

        if self.export.precision > 15 {
            return Err(SettingsError::invalid(
                "export.precision",
                format!("at most 15 digits, got {}", self.export.precision),
            ));
        }

        Ok(())
    }

    /// Grid subdivisions of a validated configuration
    pub fn grid_subdivisions(&self) -> SettingsResult<u32> {
        u32::try_from(self.canvas.grid_subdivisions)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| SettingsError::invalid("canvas.grid_subdivisions", "must be at least 1"))
    }

    /// Coordinate context for the configured unit and canvas scale
    pub fn draw_context(&self) -> DrawContext {
        DrawContext {
            storage_unit: self.document.storage_unit,
            pixels_per_bp: self.canvas.pixels_per_bp,
            magnification: self.canvas.magnification,
        }
    }

    /// Marker reference size expressed in the storage unit
    pub fn normalize_size_in_storage(&self) -> f64 {
        self.document.storage_unit.from_bp(self.document.normalize_size)
    }
}

enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.document.storage_unit, Unit::Bp);
        assert_eq!(config.export.precision, 4);
        assert_eq!(config.grid_subdivisions().unwrap(), 1);
    }

    #[test]
    fn test_rejects_non_positive_subdivisions() {
        let mut config = Config::default();
        config.canvas.grid_subdivisions = 0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { ref key, .. }) if key == "canvas.grid_subdivisions"
        ));
        config.canvas.grid_subdivisions = -3;
        assert!(config.validate().is_err());
        assert!(config.grid_subdivisions().is_err());
    }

    #[test]
    fn test_draw_context_carries_unit_and_scale() {
        let mut config = Config::default();
        config.document.storage_unit = Unit::Mm;
        config.canvas.magnification = 2.0;
        let ctx = config.draw_context();
        assert_eq!(ctx.storage_unit, Unit::Mm);
        assert_eq!(ctx.magnification, 2.0);
        assert!((ctx.component_scale() - 2.0 * 72.0 / 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("SVG".parse::<ExportFormat>().unwrap(), ExportFormat::Svg);
        assert_eq!("tex".parse::<ExportFormat>().unwrap(), ExportFormat::Pgf);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Pgf.extension(), "tex");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = Config::default().save_to_file(Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }
}
