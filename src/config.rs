//! Pipeline configuration.
//!
//! A single TOML file with full defaults — an empty file (or no file) is a
//! valid configuration. The library itself never reads config; callers pass
//! option structs directly. This module exists for the CLI and for host
//! applications that want one place to load the pipeline's knobs from:
//!
//! ```toml
//! media_root = "/media/"
//!
//! [optimize]
//! max_width = 1200
//! quality = 85
//! force_webp = false
//!
//! [thumbnail]
//! width = 300
//! height = 300
//!
//! [markdown]
//! tables = true
//! footnotes = true
//! strikethrough = true
//! smart_punctuation = false
//! ```

use crate::caption::MarkdownOptions;
use crate::imaging::{OptimizeOptions, ThumbnailSize};
use crate::shortcode::ShortcodeOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Prefix for relative shortcode image paths.
    pub media_root: String,
    pub optimize: OptimizeOptions,
    pub thumbnail: ThumbnailSize,
    pub markdown: MarkdownOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            media_root: "/media/".to_string(),
            optimize: OptimizeOptions::default(),
            thumbnail: ThumbnailSize::default(),
            markdown: MarkdownOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn shortcode_options(&self) -> ShortcodeOptions {
        ShortcodeOptions {
            media_root: self.media_root.clone(),
        }
    }

    /// Stock config with every option spelled out, for `imagemark gen-config`.
    pub fn stock_toml() -> String {
        let header = "# imagemark pipeline configuration.\n\
                      # Every key is optional; the values below are the defaults.\n\n";
        let body = toml::to_string_pretty(&Self::default())
            .unwrap_or_default();
        format!("{header}{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn partial_override() {
        let config: PipelineConfig = toml::from_str(
            r#"
            media_root = "/static/uploads/"

            [optimize]
            max_width = 800
            "#,
        )
        .unwrap();

        assert_eq!(config.media_root, "/static/uploads/");
        assert_eq!(config.optimize.max_width, 800);
        // Untouched sections keep defaults
        assert_eq!(config.optimize.quality.value(), 85);
        assert_eq!(config.thumbnail, ThumbnailSize::default());
    }

    #[test]
    fn quality_out_of_range_is_clamped() {
        let config: PipelineConfig = toml::from_str("[optimize]\nquality = 400\n").unwrap();
        assert_eq!(config.optimize.quality.value(), 100);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "media_root = [not toml").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            PipelineConfig::load(Path::new("/nonexistent/imagemark.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn stock_toml_round_trips() {
        let config: PipelineConfig = toml::from_str(&PipelineConfig::stock_toml()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn shortcode_options_carry_media_root() {
        let config = PipelineConfig {
            media_root: "/cdn/".to_string(),
            ..PipelineConfig::default()
        };
        assert_eq!(config.shortcode_options().media_root, "/cdn/");
    }
}
