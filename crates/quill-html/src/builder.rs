//! Construction entry points.
//!
//! [`element`] builds a single element from a tag, attributes and content.
//! [`HtmlBuilder`] does the same while applying rendering defaults from a
//! [`quill_config::Config`].

use std::collections::BTreeMap;
use std::path::Path;

use quill_config::{Config, ConfigValue, Overrides};

use crate::attribute::AttributeValue;
use crate::attributes::{Attributes, AttributesSource};
use crate::content::Content;
use crate::document::Document;
use crate::element::Element;
use crate::error::Result;

/// Build an element with attributes and content.
///
/// # Errors
///
/// Returns the errors of [`crate::ensure_attributes`].
///
/// # Example
///
/// ```
/// use quill_html::element;
///
/// let mut div = element("div", [("class", "a")], "hi").unwrap();
/// assert_eq!(div.render(), r#"<div class="a">hi</div>"#);
/// ```
pub fn element(
    tag: impl Into<String>,
    attributes: impl Into<AttributesSource>,
    content: impl Into<Content>,
) -> Result<Element> {
    let mut el = Element::new(tag);
    el.set_attributes(attributes)?;
    el.add(content);
    Ok(el)
}

/// Element factory carrying configured defaults.
#[derive(Debug, Clone)]
pub struct HtmlBuilder {
    separator: String,
    prefix: String,
    defaults: BTreeMap<String, Attributes>,
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self {
            separator: "\n".to_owned(),
            prefix: String::new(),
            defaults: BTreeMap::new(),
        }
    }
}

impl HtmlBuilder {
    /// Builder with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using the separator, prefix and per-tag default attributes of
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` for an invalid configured
    /// attribute name.
    pub fn from_config(config: &Config) -> Result<Self> {
        let prefix = config.attributes.prefix.clone();
        let mut defaults = BTreeMap::new();
        for (tag, values) in &config.elements {
            let mut attributes = Attributes::with_prefix(prefix.clone());
            for (name, value) in values {
                attributes.set(name, config_value(value))?;
            }
            defaults.insert(tag.clone(), attributes);
        }

        tracing::debug!(
            elements = defaults.len(),
            separator = ?config.document.separator,
            "created builder from config"
        );
        Ok(Self {
            separator: config.document.separator.clone(),
            prefix,
            defaults,
        })
    }

    /// Load `quill.toml` (explicit path or discovered) and build from it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration cannot be loaded, and the
    /// errors of [`from_config`](Self::from_config).
    pub fn load(config_path: Option<&Path>, overrides: Option<&Overrides>) -> Result<Self> {
        let config = Config::load(config_path, overrides)?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "loaded quill config");
        }
        Self::from_config(&config)
    }

    /// Separator given to new documents and elements.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Empty document using the configured separator.
    #[must_use]
    pub fn document(&self) -> Document {
        Document::with_separator(self.separator.clone())
    }

    /// Build an element, merging `attributes` into the tag's defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Attributes::add_source`].
    pub fn element(
        &self,
        tag: impl Into<String>,
        attributes: impl Into<AttributesSource>,
        content: impl Into<Content>,
    ) -> Result<Element> {
        let tag = tag.into();
        let template = self
            .defaults
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| Attributes::with_prefix(self.prefix.clone()));

        let mut el = Element::new(tag).with_default_attributes(template);
        el.attributes().add_source(attributes)?;
        el.content().set_separator(self.separator.clone());
        el.add(content);
        Ok(el)
    }
}

fn config_value(value: &ConfigValue) -> AttributeValue {
    match value {
        ConfigValue::Bool(b) => AttributeValue::Bool(*b),
        ConfigValue::Integer(n) => AttributeValue::Text(n.to_string()),
        ConfigValue::Text(s) => AttributeValue::Text(s.clone()),
        ConfigValue::List(list) => AttributeValue::List(list.clone()),
    }
}
