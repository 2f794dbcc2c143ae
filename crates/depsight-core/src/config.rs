use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use depsight_util::errors::InsightError;

/// Trailer printed after every insight report.
pub const DEFAULT_TRAILER: &str =
    "A web-based, searchable dependency report is available by adding the --scan option.";

/// Global user configuration loaded from `~/.depsight/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub report: ReportConfig,
}

/// Report settings from `[report]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub color: ColorChoice,
    #[serde(default, rename = "version-scheme")]
    pub version_scheme: VersionSchemeKind,
    #[serde(default = "default_trailer")]
    pub trailer: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::default(),
            version_scheme: VersionSchemeKind::default(),
            trailer: default_trailer(),
        }
    }
}

fn default_trailer() -> String {
    DEFAULT_TRAILER.to_string()
}

/// When to emit ANSI colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color choice `{other}` (auto, always, never)")),
        }
    }
}

/// Which version semantics order and match versions in reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSchemeKind {
    #[default]
    Maven,
    Semver,
}

impl FromStr for VersionSchemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maven" => Ok(Self::Maven),
            "semver" => Ok(Self::Semver),
            other => Err(format!("unknown version scheme `{other}` (maven, semver)")),
        }
    }
}

impl GlobalConfig {
    /// Load the global configuration from `~/.depsight/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and parse a configuration file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| InsightError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            InsightError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the depsight data directory (`~/.depsight/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".depsight")
}
