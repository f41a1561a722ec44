//! Converter configuration.
//!
//! No config file is read unless one is named explicitly (CLI `--config`
//! or `QNATSV_CONFIG`). Defaults reproduce the standard `Settings.tsv`
//! values; the column layout of the main file is fixed and not configurable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QnaTsvError, Result};

// ---------------------------------------------------------------------------
// Config structs (matching qnatsv.toml schema)
// ---------------------------------------------------------------------------

/// Top-level converter config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Values written to `Settings.tsv`.
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// `[settings]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Prefix of the `Description` value; the input basename is appended.
    #[serde(default = "default_description_prefix")]
    pub description_prefix: String,

    /// `Language` value.
    #[serde(default = "default_language")]
    pub language: String,

    /// `DefaultAnswerForKB` value.
    #[serde(default = "default_answer")]
    pub default_answer: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            description_prefix: default_description_prefix(),
            language: default_language(),
            default_answer: default_answer(),
        }
    }
}

impl SettingsConfig {
    /// The `Description` value for a given input basename.
    pub fn description(&self, basename: &str) -> String {
        format!("{} - {basename}", self.description_prefix)
    }
}

fn default_description_prefix() -> String {
    "QNA Migration".into()
}
fn default_language() -> String {
    "English".into()
}
fn default_answer() -> String {
    "No answer found".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `path` if one is given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ConverterConfig> {
    match path {
        Some(p) => load_config_from(p),
        None => {
            tracing::debug!("no config file given, using defaults");
            Ok(ConverterConfig::default())
        }
    }
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<ConverterConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QnaTsvError::io(path, e))?;

    let config = toml::from_str(&content).map_err(|e| {
        QnaTsvError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_standard_settings() {
        let config = ConverterConfig::default();
        assert_eq!(config.settings.language, "English");
        assert_eq!(config.settings.default_answer, "No answer found");
        assert_eq!(config.settings.description("export"), "QNA Migration - export");
    }

    #[test]
    fn config_roundtrip() {
        let config = ConverterConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: ConverterConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.settings.language, "English");
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let toml_str = r#"
[settings]
language = "French"
"#;
        let config: ConverterConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.settings.language, "French");
        assert_eq!(config.settings.default_answer, "No answer found");
        assert_eq!(config.settings.description_prefix, "QNA Migration");
    }

    #[test]
    fn load_without_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.settings.language, "English");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("qnatsv.toml");
        std::fs::write(&path, "[settings]\ndefault_answer = \"Sorry\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.settings.default_answer, "Sorry");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[settings\nlanguage = 1").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, QnaTsvError::Config { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/qnatsv.toml")).unwrap_err();
        assert!(matches!(err, QnaTsvError::Io { .. }));
    }
}
