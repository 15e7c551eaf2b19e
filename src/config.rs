//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/flavorwheel/flavorwheel.toml`
//! 3. Explicit config file passed on the command line (`--config`)
//! 4. Environment variables: `FLAVORWHEEL_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{ColumnNames, LeafOrder, ROOT_LABEL};

/// Raw column names for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawColumnNames {
    pub outer: Option<String>,
    pub middle: Option<String>,
    pub leaf: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub root_label: Option<String>,
    pub columns: RawColumnNames,
    pub leaf_order: Option<LeafOrder>,
    pub delimiter: Option<char>,
    pub pretty: Option<bool>,
}

/// Unified configuration for flavorwheel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Label of the synthetic root node (default: "flavors")
    pub root_label: String,
    /// Leaf ordering under each middle node
    pub leaf_order: LeafOrder,
    /// Field delimiter, must be a single ASCII character
    pub delimiter: char,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Input column names (kept last: serialized as a TOML table)
    pub columns: ColumnNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_label: ROOT_LABEL.to_string(),
            leaf_order: LeafOrder::default(),
            delimiter: ',',
            pretty: true,
            columns: ColumnNames::default(),
        }
    }
}

/// Get the XDG config directory for flavorwheel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flavorwheel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("flavorwheel.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ApplicationError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ApplicationError::Config {
                message: format!("delimiter must be ASCII, got '{}'", self.delimiter),
            })
        }
    }

    /// Overlay a raw layer onto self: every value the layer specifies wins.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
            columns: ColumnNames {
                outer: overlay
                    .columns
                    .outer
                    .clone()
                    .unwrap_or_else(|| self.columns.outer.clone()),
                middle: overlay
                    .columns
                    .middle
                    .clone()
                    .unwrap_or_else(|| self.columns.middle.clone()),
                leaf: overlay
                    .columns
                    .leaf
                    .clone()
                    .unwrap_or_else(|| self.columns.leaf.clone()),
            },
            leaf_order: overlay.leaf_order.unwrap_or(self.leaf_order),
            delimiter: overlay.delimiter.unwrap_or(self.delimiter),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line. Unlike
    ///   the global file, it must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("load: explicit config {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.delimiter_byte()?;
        Ok(current)
    }

    /// Load defaults overlaid with a single file, skipping global and env layers.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let settings = Self::default().merge_with(&raw);
        settings.delimiter_byte()?;
        Ok(settings)
    }

    /// Apply FLAVORWHEEL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FLAVORWHEEL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }
        if let Ok(val) = config.get_string("columns.outer") {
            settings.columns.outer = val;
        }
        if let Ok(val) = config.get_string("columns.middle") {
            settings.columns.middle = val;
        }
        if let Ok(val) = config.get_string("columns.leaf") {
            settings.columns.leaf = val;
        }
        if let Ok(val) = config.get_string("leaf_order") {
            settings.leaf_order = val.parse().map_err(|message| ApplicationError::Config {
                message,
            })?;
        }
        if let Ok(val) = config.get_string("delimiter") {
            let mut chars = val.chars();
            settings.delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ApplicationError::Config {
                        message: format!("delimiter must be one character, got '{val}'"),
                    })
                }
            };
        }
        match config.get_bool("pretty") {
            Ok(val) => settings.pretty = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
