use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::render::form::{DEFAULT_LONG_TEXT_THRESHOLD, FormMode, FormOptions};
use crate::render::table::{
    DEFAULT_NARROW_COLUMN_WIDTH, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, TableOptions,
};

/// Project configuration loaded from `.oar.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OarConfig {
    /// Document path or http(s) URL.
    pub input: String,
    /// Origin that relative server URLs are joined against when the
    /// document was not fetched from a URL.
    pub base_origin: Option<String>,
    pub analysis: AnalysisConfig,
    pub render: RenderConfig,
}

impl Default for OarConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            base_origin: None,
            analysis: AnalysisConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Resource discovery tweaks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Path segments ignored in addition to the built-in list.
    pub extra_ignored_segments: Vec<String>,
}

/// Form and table defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub long_text_threshold: u64,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub narrow_column_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            long_text_threshold: DEFAULT_LONG_TEXT_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            narrow_column_width: DEFAULT_NARROW_COLUMN_WIDTH,
        }
    }
}

impl RenderConfig {
    pub fn form_options(&self, mode: FormMode) -> FormOptions {
        FormOptions {
            long_text_threshold: self.long_text_threshold,
            ..FormOptions::new(mode)
        }
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            page_size: self.page_size,
            page_size_options: self.page_size_options.clone(),
            narrow_column_width: self.narrow_column_width,
            ..TableOptions::default()
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oar.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OarConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: OarConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oar configuration
input: openapi.yaml        # file path or http(s) URL
# base_origin: https://api.example.com   # joins relative server URLs

analysis:
  extra_ignored_segments: []
    # - internal
    # - admin

render:
  long_text_threshold: 255   # maxLength above which strings get a textarea
  page_size: 20
  page_size_options: [10, 20, 50, 100]
  narrow_column_width: 100   # width of boolean/array/object columns
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OarConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert!(config.base_origin.is_none());
        assert!(config.analysis.extra_ignored_segments.is_empty());
        assert_eq!(config.render.long_text_threshold, 255);
        assert_eq!(config.render.page_size, 20);
        assert_eq!(config.render.page_size_options, vec![10, 20, 50, 100]);
        assert_eq!(config.render.narrow_column_width, 100);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: https://example.com/openapi.json
base_origin: https://api.example.com
analysis:
  extra_ignored_segments: [internal, admin]
render:
  long_text_threshold: 500
  page_size: 50
  page_size_options: [25, 50]
  narrow_column_width: 80
"#;
        let config: OarConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "https://example.com/openapi.json");
        assert_eq!(config.base_origin.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.analysis.extra_ignored_segments, vec!["internal", "admin"]);

        let table = config.render.table_options();
        assert_eq!(table.page_size, 50);
        assert_eq!(table.page_size_options, vec![25, 50]);
        assert_eq!(table.narrow_column_width, 80);
        let form = config.render.form_options(FormMode::Edit);
        assert_eq!(form.long_text_threshold, 500);
        assert_eq!(form.mode, FormMode::Edit);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: OarConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        // Defaults applied
        assert_eq!(config.render.page_size, 20);
    }

    #[test]
    fn test_default_content_parses() {
        let config: OarConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.render.long_text_threshold, 255);
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_config(&path).unwrap().is_none());

        std::fs::write(&path, "render:\n  page_size: 10\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.render.page_size, 10);
        assert_eq!(config.input, "openapi.yaml");

        std::fs::write(&path, "render: [").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
