//! Ordered, name-keyed attribute collections.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::attribute::{Attribute, AttributeValue};
use crate::content::json_type_name;
use crate::error::{Error, Result};

/// Ordered collection of [`Attribute`]s with unique names.
///
/// Adding a name that already exists merges values; [`set`](Self::set)
/// replaces them. The `prefix` is written in front of every rendered
/// attribute.
///
/// # Example
///
/// ```
/// use quill_html::Attributes;
///
/// let mut attrs = Attributes::new();
/// attrs.add("class", "btn").unwrap();
/// attrs.add("class", ["btn", "primary"]).unwrap();
/// attrs.set("disabled", true).unwrap();
/// assert_eq!(attrs.render(), r#"class="btn primary" disabled"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    attributes: Vec<Attribute>,
    prefix: String,
}

/// Inputs accepted by [`Attributes::add_source`] and [`ensure_attributes`].
#[derive(Debug)]
pub enum AttributesSource {
    /// Nothing to add.
    None,
    /// An existing collection.
    Attributes(Attributes),
    /// A single attribute.
    Attribute(Attribute),
    /// Name/value pairs, in order.
    Pairs(Vec<(String, AttributeValue)>),
    /// Dynamic input; only objects and `null` are accepted.
    Json(Value),
}

impl From<Attributes> for AttributesSource {
    fn from(attributes: Attributes) -> Self {
        Self::Attributes(attributes)
    }
}

impl From<Attribute> for AttributesSource {
    fn from(attribute: Attribute) -> Self {
        Self::Attribute(attribute)
    }
}

impl From<Value> for AttributesSource {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<()> for AttributesSource {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl<T: Into<AttributesSource>> From<Option<T>> for AttributesSource {
    fn from(source: Option<T>) -> Self {
        source.map_or(Self::None, Into::into)
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> From<Vec<(K, V)>> for AttributesSource {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::Pairs(collect_pairs(pairs))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>, const N: usize> From<[(K, V); N]>
    for AttributesSource
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::Pairs(collect_pairs(pairs))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> From<BTreeMap<K, V>> for AttributesSource {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Pairs(collect_pairs(map))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>, S> From<HashMap<K, V, S>> for AttributesSource {
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::Pairs(collect_pairs(map))
    }
}

fn collect_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<(String, AttributeValue)>
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

impl Attributes {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection rendering with `prefix`.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            prefix: prefix.into(),
        }
    }

    /// Prefix written before each rendered attribute.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Change the render prefix.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    /// Number of attributes, including ones that render to nothing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the collection holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Whether an attribute named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Look up an attribute without creating it.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    /// Get the attribute named `name`, creating an empty one if missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` if a new attribute has to be
    /// created and `name` is invalid.
    pub fn get(&mut self, name: &str) -> Result<&mut Attribute> {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.attributes.push(Attribute::new(name)?);
                self.attributes.len() - 1
            }
        };
        Ok(&mut self.attributes[index])
    }

    /// Store a fresh attribute, replacing any existing one in place.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` for an invalid name.
    pub fn set(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        let attribute = Attribute::with_value(name, value)?;
        match self.position(name) {
            Some(index) => self.attributes[index] = attribute,
            None => self.attributes.push(attribute),
        }
        Ok(self)
    }

    /// Merge `value` into the attribute named `name`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` for an invalid name.
    pub fn add(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        match self.position(name) {
            Some(index) => {
                self.attributes[index].add_value(value);
            }
            None => self.attributes.push(Attribute::with_value(name, value)?),
        }
        Ok(self)
    }

    /// Merge a whole attribute into the same-named one, or store it.
    pub fn add_attribute(&mut self, attribute: Attribute) -> &mut Self {
        match self.position(attribute.name()) {
            Some(index) => {
                self.attributes[index].add_value(attribute.value());
            }
            None => self.attributes.push(attribute),
        }
        self
    }

    /// Merge every attribute of `other`.
    pub fn merge(&mut self, other: Attributes) -> &mut Self {
        for attribute in other.attributes {
            self.add_attribute(attribute);
        }
        self
    }

    /// Merge each name/value pair in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` on the first invalid name. Pairs
    /// before it have already been added.
    pub fn extend<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<&mut Self>
    where
        K: AsRef<str>,
        V: Into<AttributeValue>,
    {
        for (name, value) in pairs {
            self.add(name.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Merge any supported source.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` for invalid names and
    /// `Error::UnsupportedType` for JSON input that is not an object of
    /// scalars or string lists.
    pub fn add_source(&mut self, source: impl Into<AttributesSource>) -> Result<&mut Self> {
        match source.into() {
            AttributesSource::None => {}
            AttributesSource::Attributes(other) => {
                self.merge(other);
            }
            AttributesSource::Attribute(attribute) => {
                self.add_attribute(attribute);
            }
            AttributesSource::Pairs(pairs) => {
                self.extend(pairs)?;
            }
            AttributesSource::Json(value) => {
                self.extend(json_pairs(value)?)?;
            }
        }
        Ok(self)
    }

    /// Delete the attribute named `name` and return it.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.position(name).map(|index| self.attributes.remove(index))
    }

    /// Remove list entries from the attribute named `name`, keeping the
    /// attribute itself. A missing attribute is left alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotAList` if the attribute does not hold a list.
    pub fn remove_value(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        if let Some(index) = self.position(name) {
            self.attributes[index].remove_value(value)?;
        }
        Ok(self)
    }

    /// Render all attributes that produce output, each behind the prefix.
    ///
    /// Returns an empty string when nothing renders.
    #[must_use]
    pub fn render(&self) -> String {
        let rendered: Vec<String> = self.attributes.iter().filter_map(Attribute::render).collect();
        if rendered.is_empty() {
            return String::new();
        }
        let separator = format!(" {}", self.prefix);
        format!("{}{}", self.prefix, rendered.join(separator.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }
}

/// Normalize any supported source into a collection.
///
/// An existing [`Attributes`] is returned as is; everything else builds a new
/// collection.
///
/// # Errors
///
/// Returns `Error::UnsupportedType` naming the received JSON type for input
/// other than an object or `null`, and `Error::InvalidAttributeName` for
/// invalid names.
pub fn ensure_attributes(source: impl Into<AttributesSource>) -> Result<Attributes> {
    match source.into() {
        AttributesSource::Attributes(attributes) => Ok(attributes),
        other => {
            let mut attributes = Attributes::new();
            attributes.add_source(other)?;
            Ok(attributes)
        }
    }
}

fn json_pairs(value: Value) -> Result<Vec<(String, AttributeValue)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| json_attribute_value(value).map(|value| (name, value)))
            .collect(),
        other => Err(Error::UnsupportedType {
            context: "attributes",
            found: json_type_name(&other),
        }),
    }
}

fn json_attribute_value(value: Value) -> Result<AttributeValue> {
    match value {
        Value::Null => Ok(AttributeValue::Absent),
        Value::Bool(b) => Ok(AttributeValue::Bool(b)),
        Value::Number(n) => Ok(AttributeValue::Text(n.to_string())),
        Value::String(s) => Ok(AttributeValue::Text(s)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(Error::UnsupportedType {
                    context: "attribute list entry",
                    found: json_type_name(&other),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(AttributeValue::List),
        Value::Object(_) => Err(Error::UnsupportedType {
            context: "attribute value",
            found: "object",
        }),
    }
}
