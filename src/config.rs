//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/menutree/menutree.toml`
//! 3. Local config: `<dir>/.menutree.toml` (directory of the menu document)
//! 4. Environment variables: `MENUTREE__*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{NamePolicy, MENU_NODE_SUFFIX};

/// Menu node naming convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    /// Suffix every menu node name must carry
    pub suffix: String,
    /// Reject nodes whose name lacks the suffix
    pub enforce: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            suffix: MENU_NODE_SUFFIX.to_string(),
            enforce: true,
        }
    }
}

impl NamingConfig {
    pub fn policy(&self) -> NamePolicy {
        NamePolicy {
            suffix: self.suffix.clone(),
            enforce: self.enforce,
        }
    }
}

/// How commands print menu data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Tree => write!(f, "tree"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tree,
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub naming: RawNamingConfig,
    pub output: RawOutputConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawNamingConfig {
    pub suffix: Option<String>,
    pub enforce: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub format: Option<OutputFormat>,
    pub pretty: Option<bool>,
}

/// Unified configuration for menutree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub naming: NamingConfig,
    pub output: OutputConfig,
}

/// Get the XDG config directory for menutree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "menutree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("menutree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".menutree.toml")
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

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            naming: NamingConfig {
                suffix: overlay
                    .naming
                    .suffix
                    .clone()
                    .unwrap_or_else(|| self.naming.suffix.clone()),
                enforce: overlay.naming.enforce.unwrap_or(self.naming.enforce),
            },
            output: OutputConfig {
                format: overlay.output.format.unwrap_or(self.output.format),
                pretty: overlay.output.pretty.unwrap_or(self.output.pretty),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.menutree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/menutree/menutree.toml`
    /// 3. Local config: `<local_dir>/.menutree.toml`
    /// 4. Environment variables: `MENUTREE__*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply MENUTREE__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MENUTREE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("naming.suffix") {
            settings.naming.suffix = val;
        }
        if let Ok(val) = config.get_bool("naming.enforce") {
            settings.naming.enforce = val;
        }
        if let Ok(val) = config.get::<OutputFormat>("output.format") {
            settings.output.format = val;
        }
        if let Ok(val) = config.get_bool("output.pretty") {
            settings.output.pretty = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# menutree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/menutree/menutree.toml
#   Local:  <document_dir>/.menutree.toml
#   Env:    MENUTREE__* environment variables, e.g. MENUTREE__NAMING__ENFORCE=false

[naming]
# Suffix every menu node name must end with
# suffix = "-item"

# Reject documents containing menu nodes without the suffix
# enforce = true

[output]
# Default output of show/options/children: "tree" or "json"
# format = "tree"

# Pretty-print JSON
# pretty = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
