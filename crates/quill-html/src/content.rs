//! Renderable nodes and content normalization.
//!
//! [`Content`] is what tree-building calls accept: a node, a scalar that
//! becomes [`Text`], a list, or nothing. [`ensure_content`] accepts the same
//! shapes from dynamic JSON input and rejects objects.

use std::fmt;

use serde_json::Value;

use crate::document::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::text::{DeferredText, Text};

/// Anything that can produce HTML.
///
/// Containers take `&mut self` because rendering runs their one-time
/// assembly first.
pub trait Render {
    /// Serialize to an HTML fragment.
    fn render(&mut self) -> String;
}

impl Render for Text {
    fn render(&mut self) -> String {
        Text::render(self)
    }
}

impl Render for DeferredText {
    fn render(&mut self) -> String {
        DeferredText::render(self)
    }
}

/// A node stored in a [`Document`].
pub enum Node {
    /// Escaped or raw string.
    Text(Text),
    /// String computed at render time.
    Deferred(DeferredText),
    /// Nested container without a tag.
    Document(Document),
    /// Tagged element.
    Element(Element),
    /// Caller-defined renderable.
    Custom(Box<dyn Render>),
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Deferred(text) => f.debug_tuple("Deferred").field(text).finish(),
            Self::Document(doc) => f.debug_tuple("Document").field(doc).finish(),
            Self::Element(el) => f.debug_tuple("Element").field(el).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Node {
    /// Borrow as an element, if this node is one.
    #[must_use]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Borrow as a document, if this node is one.
    #[must_use]
    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl Render for Node {
    fn render(&mut self) -> String {
        match self {
            Self::Text(text) => text.render(),
            Self::Deferred(text) => text.render(),
            Self::Document(doc) => doc.render(),
            Self::Element(el) => el.render(),
            Self::Custom(custom) => custom.render(),
        }
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<DeferredText> for Node {
    fn from(text: DeferredText) -> Self {
        Self::Deferred(text)
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<Box<dyn Render>> for Node {
    fn from(custom: Box<dyn Render>) -> Self {
        Self::Custom(custom)
    }
}

/// Input accepted by `add`, `prepend` and `set_content`.
#[derive(Debug, Default)]
pub enum Content {
    /// Nothing; adding it is a no-op.
    #[default]
    Empty,
    /// A single node.
    Node(Node),
    /// A sequence. Nested lists become nested documents.
    List(Vec<Content>),
}

impl Content {
    /// Normalize to a single renderable node. Lists become a [`Document`]
    /// using `separator`; empty content yields `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use quill_html::{Render, ensure_content};
    /// use serde_json::json;
    ///
    /// let mut node = ensure_content(json!(["<a>", 1])).unwrap().into_node(" ").unwrap();
    /// assert_eq!(node.render(), "&lt;a&gt; 1");
    /// ```
    #[must_use]
    pub fn into_node(self, separator: &str) -> Option<Node> {
        match self {
            Self::Empty => None,
            Self::Node(node) => Some(node),
            Self::List(items) => {
                let mut doc = Document::with_separator(separator);
                doc.add(Self::List(items));
                Some(Node::Document(doc))
            }
        }
    }
}

macro_rules! impl_node_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Self::Text(Text::new(value))
                }
            }
        )*
    };
}

impl_node_from_scalar!(
    &str, String, &String, char, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32,
    f64
);

macro_rules! impl_content_from_node {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Content {
                fn from(value: $ty) -> Self {
                    Self::Node(value.into())
                }
            }
        )*
    };
}

impl_content_from_node!(
    Node,
    Text,
    DeferredText,
    Document,
    Element,
    Box<dyn Render>,
    &str,
    String,
    &String,
    char,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64
);

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Content>, const N: usize> From<[T; N]> for Content {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl From<()> for Content {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl TryFrom<Value> for Content {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        ensure_content(value)
    }
}

/// Normalize dynamic input into [`Content`].
///
/// `null` is empty, strings, numbers and booleans become escaped [`Text`],
/// arrays become lists (recursively). Add the result to a container, or turn
/// it into a standalone [`Node`] with [`Content::into_node`].
///
/// # Errors
///
/// Returns `Error::UnsupportedType` naming `object` for JSON objects, at any
/// depth.
///
/// # Example
///
/// ```
/// use quill_html::{Document, ensure_content};
/// use serde_json::json;
///
/// let mut doc = Document::with_separator(" ");
/// doc.add(ensure_content(json!(["a", 1, ["<b>"]])).unwrap());
/// assert_eq!(doc.render(), "a 1 &lt;b&gt;");
/// assert!(ensure_content(json!({"a": 1})).is_err());
/// ```
pub fn ensure_content(value: Value) -> Result<Content> {
    match value {
        Value::Null => Ok(Content::Empty),
        Value::Bool(b) => Ok(b.into()),
        Value::Number(n) => Ok(Content::Node(Node::Text(Text::new(n)))),
        Value::String(s) => Ok(s.into()),
        Value::Array(items) => items
            .into_iter()
            .map(ensure_content)
            .collect::<Result<Vec<_>>>()
            .map(Content::List),
        Value::Object(_) => Err(Error::UnsupportedType {
            context: "content",
            found: "object",
        }),
    }
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    struct Shout(&'static str);

    impl Render for Shout {
        fn render(&mut self) -> String {
            self.0.to_uppercase()
        }
    }

    #[test]
    fn test_scalars_become_text() {
        let Content::Node(Node::Text(text)) = Content::from(7) else {
            panic!("expected text node");
        };
        assert_eq!(text.content(), "7");
        assert!(!text.is_encoded());

        let mut doc = Document::with_separator(" ");
        doc.add(5u8).add(-3i16).add(-1isize).add(2u16).add(-8i8);
        assert_eq!(doc.render(), "5 -3 -1 2 -8");
    }

    #[test]
    fn test_nested_list_becomes_document() {
        let node = Content::from(vec!["a", "b"]).into_node(",").unwrap();
        let Node::Document(mut doc) = node else {
            panic!("expected document node");
        };
        assert_eq!(doc.count(), 2);
        assert_eq!(doc.render(), "a,b");
    }

    #[test]
    fn test_empty_content() {
        assert!(Content::from(()).into_node("").is_none());
        assert!(Content::from(None::<&str>).into_node("").is_none());
    }

    #[test]
    fn test_custom_node_renders() {
        let custom: Box<dyn Render> = Box::new(Shout("hi"));
        let mut node = Node::from(custom);
        assert_eq!(node.render(), "HI");
    }

    #[test]
    fn test_ensure_content_rejects_object() {
        let err = ensure_content(json!([1, {"k": "v"}])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "unsupported content type: object");
    }

    #[test]
    fn test_ensure_content_shapes() {
        assert!(matches!(ensure_content(Value::Null).unwrap(), Content::Empty));
        assert!(matches!(
            ensure_content(json!(true)).unwrap(),
            Content::Node(Node::Text(_))
        ));
        let Content::List(items) = Content::try_from(json!(["x", null, [1]])).unwrap() else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(items[2], Content::List(_)));
    }

    #[test]
    fn test_ensure_content_into_standalone_node() {
        let mut node = ensure_content(json!("<b>")).unwrap().into_node("\n").unwrap();
        assert_eq!(node.render(), "&lt;b&gt;");

        let mut list = ensure_content(json!(["a", ["b", "c"]]))
            .unwrap()
            .into_node("|")
            .unwrap();
        assert_eq!(list.render(), "a|b|c");
        assert!(ensure_content(Value::Null).unwrap().into_node("").is_none());
    }
}
