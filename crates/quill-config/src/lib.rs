//! Rendering defaults for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Overrides supplied by the caller can be applied during load via
//! [`Overrides`].
//!
//! ## Example
//!
//! ```toml
//! [document]
//! separator = ""
//!
//! [attributes]
//! prefix = ""
//!
//! [elements.a]
//! rel = "noopener"
//!
//! [elements.input]
//! required = true
//! ```
//!
//! Default attributes of an element table are applied in name order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override the document separator.
    pub separator: Option<String>,
    /// Override the attribute prefix.
    pub prefix: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document rendering settings.
    pub document: DocumentConfig,
    /// Attribute rendering settings.
    pub attributes: AttributesConfig,
    /// Default attributes keyed by tag name.
    pub elements: BTreeMap<String, BTreeMap<String, ConfigValue>>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Document rendering settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// String inserted between rendered children.
    pub separator: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            separator: "\n".to_owned(),
        }
    }
}

/// Attribute rendering settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttributesConfig {
    /// Prefix prepended to every rendered attribute name.
    pub prefix: String,
}

/// A default attribute value as written in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// `required = true`
    Bool(bool),
    /// `tabindex = 0`
    Integer(i64),
    /// `rel = "noopener"`
    Text(String),
    /// `class = ["btn", "btn-primary"]`
    List(Vec<String>),
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` or `ConfigError::Validation`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default attributes configured for `tag`, if any.
    #[must_use]
    pub fn element_defaults(&self, tag: &str) -> Option<&BTreeMap<String, ConfigValue>> {
        self.elements.get(tag)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a tag name is empty or contains
    /// whitespace or markup characters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tag in self.elements.keys() {
            if tag.is_empty() {
                return Err(ConfigError::Validation(
                    "elements table name cannot be empty".to_owned(),
                ));
            }
            if tag
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '"' | '\''))
            {
                return Err(ConfigError::Validation(format!(
                    "elements.{tag} is not a valid tag name"
                )));
            }
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(separator) = &overrides.separator {
            self.document.separator.clone_from(separator);
        }
        if let Some(prefix) = &overrides.prefix {
            self.attributes.prefix.clone_from(prefix);
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.document.separator, "\n");
        assert_eq!(config.attributes.prefix, "");
        assert!(config.elements.is_empty());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.document.separator, "\n");
    }

    #[test]
    fn test_parse_element_defaults() {
        let toml = r#"
[document]
separator = ""

[elements.a]
rel = "noopener"

[elements.input]
required = true
tabindex = 0
class = ["field", "wide"]
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.document.separator, "");

        let a = config.element_defaults("a").unwrap();
        assert_eq!(a.get("rel"), Some(&ConfigValue::Text("noopener".to_owned())));

        let input = config.element_defaults("input").unwrap();
        assert_eq!(input.get("required"), Some(&ConfigValue::Bool(true)));
        assert_eq!(input.get("tabindex"), Some(&ConfigValue::Integer(0)));
        assert_eq!(
            input.get("class"),
            Some(&ConfigValue::List(vec![
                "field".to_owned(),
                "wide".to_owned()
            ]))
        );
        assert!(config.element_defaults("div").is_none());
    }

    #[test]
    fn test_invalid_tag_name_rejected() {
        let toml = r#"
[elements."my tag"]
id = "x"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("my tag"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("[document\nseparator = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("quill.toml");
        let err = Config::load(Some(&missing), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_path_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[attributes]\nprefix = \"data-\"\n").unwrap();

        let overrides = Overrides {
            separator: Some(" ".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert_eq!(config.attributes.prefix, "data-");
        assert_eq!(config.document.separator, " ");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
