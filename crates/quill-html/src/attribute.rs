//! A single named HTML attribute.

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::escape::encode;

/// Attribute names: a letter, then letters, digits, `:`, `_`, `.` or `-`.
static ATTRIBUTE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9:_.\-]*$").unwrap());

/// Value held by an [`Attribute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttributeValue {
    /// No value; the attribute is omitted from output.
    #[default]
    Absent,
    /// Boolean attribute: `true` renders the bare name, `false` omits it.
    Bool(bool),
    /// Single text value.
    Text(String),
    /// Ordered list of values, joined on render.
    List(Vec<String>),
}

impl AttributeValue {
    /// Whether the value is a list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Convert to list form. Text becomes a single entry; absent and boolean
    /// values become an empty list.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Absent | Self::Bool(_) => Vec::new(),
            Self::Text(s) => vec![s],
            Self::List(list) => list,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for AttributeValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(list: Vec<String>) -> Self {
        Self::List(list)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(list: Vec<&str>) -> Self {
        Self::List(list.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AttributeValue {
    fn from(list: [&str; N]) -> Self {
        Self::List(list.into_iter().map(str::to_owned).collect())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(n: $ty) -> Self {
                    Self::Text(n.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f32, f64);

type Getter = Rc<dyn Fn() -> AttributeValue>;
type Setter = Rc<dyn Fn(AttributeValue) -> AttributeValue>;

/// A named attribute value with merge and render semantics.
///
/// An optional getter replaces the stored value on read and an optional
/// setter transforms values on write.
///
/// # Example
///
/// ```
/// use quill_html::Attribute;
///
/// let mut class = Attribute::new("class").unwrap();
/// class.add_value("a").add_value(["a", "b"]);
/// assert_eq!(class.render().as_deref(), Some(r#"class="a b""#));
/// ```
#[derive(Clone)]
pub struct Attribute {
    name: String,
    value: AttributeValue,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("has_getter", &self.getter.is_some())
            .field("has_setter", &self.setter.is_some())
            .finish()
    }
}

impl Attribute {
    /// Create an attribute with no value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` if `name` is not a valid name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_value(name, AttributeValue::Absent)
    }

    /// Create an attribute holding `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` if `name` is not a valid name.
    pub fn with_value(name: impl Into<String>, value: impl Into<AttributeValue>) -> Result<Self> {
        let name = name.into();
        if !ATTRIBUTE_NAME_RE.is_match(&name) {
            return Err(Error::InvalidAttributeName(name));
        }
        Ok(Self {
            name,
            value: value.into(),
            getter: None,
            setter: None,
        })
    }

    /// Install a getter whose result replaces the stored value on read.
    #[must_use]
    pub fn with_getter(mut self, getter: impl Fn() -> AttributeValue + 'static) -> Self {
        self.getter = Some(Rc::new(getter));
        self
    }

    /// Install a setter whose result is stored in place of written values.
    #[must_use]
    pub fn with_setter(
        mut self,
        setter: impl Fn(AttributeValue) -> AttributeValue + 'static,
    ) -> Self {
        self.setter = Some(Rc::new(setter));
        self
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value, as reported by the getter if one is installed.
    #[must_use]
    pub fn value(&self) -> AttributeValue {
        match &self.getter {
            Some(getter) => getter(),
            None => self.value.clone(),
        }
    }

    /// Replace the value, passing it through the setter if one is installed.
    pub fn set_value(&mut self, value: impl Into<AttributeValue>) -> &mut Self {
        let value = value.into();
        self.value = match &self.setter {
            Some(setter) => setter(value),
            None => value,
        };
        self
    }

    /// Merge `value` into the stored value as an ordered set.
    ///
    /// The stored value is promoted to a list first. Entries already present
    /// are skipped, so the list never holds duplicates afterwards. Booleans do
    /// not merge: adding one replaces the value.
    pub fn add_value(&mut self, value: impl Into<AttributeValue>) -> &mut Self {
        let value = value.into();
        if let AttributeValue::Bool(_) = value {
            self.value = value;
            return self;
        }

        let existing = std::mem::take(&mut self.value).into_list();
        let mut merged: Vec<String> = Vec::with_capacity(existing.len());
        for item in existing.into_iter().chain(value.into_list()) {
            if !merged.contains(&item) {
                merged.push(item);
            }
        }
        self.value = AttributeValue::List(merged);
        self
    }

    /// Remove every list entry equal to an entry of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotAList` if the stored value is not a list.
    pub fn remove_value(&mut self, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        let AttributeValue::List(list) = &mut self.value else {
            return Err(Error::NotAList {
                name: self.name.clone(),
            });
        };
        let remove = value.into().into_list();
        list.retain(|item| !remove.contains(item));
        Ok(self)
    }

    /// Render as `name="value"`.
    ///
    /// Returns `None` when the value is absent or `false`, and the bare name
    /// when it is `true`. List values are joined with `;` for `style` and
    /// with a space otherwise.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        let value = match self.value() {
            AttributeValue::Absent | AttributeValue::Bool(false) => return None,
            AttributeValue::Bool(true) => return Some(self.name.clone()),
            AttributeValue::Text(s) => s,
            AttributeValue::List(list) => {
                let separator = if self.name == "style" { ";" } else { " " };
                list.join(separator)
            }
        };
        Some(format!(r#"{}="{}""#, self.name, encode(&value)))
    }
}
