use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::ExportFormat;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "LAZ_CONVERTER_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "laz-converter.json";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// User-tunable settings. Every field has a default, so a partial (or absent)
/// JSON file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub install: InstallCommand,
    /// Format preselected in the UI.
    pub default_format: ExportFormat,
    /// Upper bound on points drawn in the preview plot.
    pub preview_max_points: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            install: InstallCommand::default(),
            default_format: ExportFormat::Csv,
            preview_max_points: 20_000,
        }
    }
}

/// HTTP settings for URL sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Command run when the user asks to install the LAZ backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for InstallCommand {
    fn default() -> Self {
        Self {
            program: "cargo".into(),
            args: ["install", "--locked", env!("CARGO_PKG_NAME"), "--features", "laz"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl InstallCommand {
    /// Shell-style rendering for display.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl AppConfig {
    /// Load from `$LAZ_CONVERTER_CONFIG`, else `./laz-converter.json`, else defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.fetch.timeout_secs, 120);
        assert_eq!(config.default_format, ExportFormat::Csv);
        assert_eq!(
            config.install.display(),
            "cargo install --locked laz-converter --features laz"
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "fetch": {{ "timeout_secs": 5 }}, "default_format": "Xyz" }}"#)
            .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.default_format, ExportFormat::Xyz);
        assert_eq!(config.preview_max_points, 20_000);
        assert_eq!(config.install, InstallCommand::default());
    }

    #[test]
    fn invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }
}
