//! TOML configuration loading.
//!
//! A config file can override the default conversion settings and add
//! custom presets on top of the built-in ones:
//!
//! ```toml
//! [defaults]
//! format = "jpeg"
//! quality = 90
//!
//! [[presets]]
//! name = "Thumbnails"
//! format = "jpeg"
//! quality = 40
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{QueueError, Result};
use crate::settings::{builtin_presets, ConversionSettings, Preset};

/// Application configuration, from file or defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Default settings applied when the command line overrides nothing
    #[serde(default)]
    pub defaults: ConversionSettings,

    /// Custom presets appended after the built-in ones
    #[serde(default)]
    pub presets: Vec<Preset>,
}

impl AppConfig {
    /// Load configuration from an explicit path, a discovered file, or
    /// defaults when no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        match config_path {
            Some(p) => load_config_file(&p),
            None => Ok(Self::default()),
        }
    }

    /// Built-in presets followed by configured ones.
    pub fn all_presets(&self) -> Vec<Preset> {
        let mut presets = builtin_presets();
        presets.extend(self.presets.iter().cloned());
        presets
    }
}

/// Find a configuration file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        ".imgpress.toml",
        "imgpress.toml",
        ".config/imgpress.toml",
    ];

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file.
fn load_config_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        QueueError::Config(format!("failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        QueueError::Config(format!("failed to parse config file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgpress_codec::OutputFormat;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.defaults.format, OutputFormat::WebP);
        assert_eq!(config.all_presets().len(), builtin_presets().len());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[defaults]\nformat = \"jpeg\"\nquality = 90\n\n[[presets]]\nname = \"Thumbnails\"\nformat = \"jpeg\"\nquality = 40\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.defaults.format, OutputFormat::Jpeg);
        assert_eq!(config.defaults.quality.get(), 90);
        assert_eq!(config.all_presets().len(), builtin_presets().len() + 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\nquality = 55\n").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.defaults.format, OutputFormat::WebP);
        assert_eq!(config.defaults.quality.get(), 55);
        assert!(config.presets.is_empty());
    }

    #[test]
    fn test_out_of_range_quality_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\nquality = 5\n").unwrap();

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(QueueError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_errors() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(QueueError::Config(_))));
    }
}
