//! JDRKit Settings Crate
//!
//! Handles drawing configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{CanvasSettings, Config, DocumentSettings, ExportFormat, ExportSettings};
pub use error::{SettingsError, SettingsResult};
