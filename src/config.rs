use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Converter configuration, read-only for the duration of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub docx_conversion: DocxConversionConfig,
    pub heading_filter: HeadingFilterConfig,
    /// Rules consumed by the color classifier only
    pub docx_color_conversion: ColorRules,
}

/// Reserved conversion knobs. None of them changes the pipeline today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocxConversionConfig {
    pub enable_structural_style_inference: bool,
    pub min_following_paragraphs: u32,
    pub generic_heading_match: bool,
}

impl Default for DocxConversionConfig {
    fn default() -> Self {
        Self {
            enable_structural_style_inference: true,
            min_following_paragraphs: 3,
            generic_heading_match: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingFilterConfig {
    pub max_active_styles: usize,
    /// Styles excluded from the heading structure unless the caller says otherwise
    pub default_exclusions: Vec<String>,
}

impl Default for HeadingFilterConfig {
    fn default() -> Self {
        Self {
            max_active_styles: 5,
            default_exclusions: Vec::new(),
        }
    }
}

/// Color token to output class tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRules {
    /// Hex (`#ff0000`) or prefixed (`background-yellow`) token -> class
    pub color_mappings: BTreeMap<String, String>,
    /// Theme color name -> class, for `theme-<name>` tokens
    pub theme_map: BTreeMap<String, String>,
}

impl ConverterConfig {
    /// Load configuration from the config directory, defaults when absent
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        log::debug!("No configuration file found, using defaults");
        Ok(ConverterConfig::default())
    }

    /// Load configuration from an explicit TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docx-topics").join("config.toml"))
    }
}
