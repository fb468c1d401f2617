//! Tagged elements.

use std::fmt;

use crate::attribute::AttributeValue;
use crate::attributes::{Attributes, AttributesSource, ensure_attributes};
use crate::content::{Content, Node, Render};
use crate::document::{Assembly, Document, NodeId};
use crate::error::Result;

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// A [`Document`] wrapped in an HTML tag with attributes.
///
/// An empty tag renders the content only. Void elements such as `br` render
/// the opening tag alone; content added to them is kept but never rendered.
/// Void tags are matched ASCII case-insensitively, so `BR` is void too and
/// renders as `<BR>`. The tag is always written as given.
///
/// # Example
///
/// ```
/// use quill_html::Element;
///
/// let mut link = Element::new("a");
/// link.attr("href", "/docs?a=1&b=2").unwrap();
/// link.add("Docs");
/// assert_eq!(link.render(), r#"<a href="/docs?a=1&amp;b=2">Docs</a>"#);
/// ```
pub struct Element {
    tag: String,
    content: Document,
    attributes: Option<Attributes>,
    default_attributes: Option<Attributes>,
    assembly: Assembly<Element>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attributes", &self.attributes)
            .field("default_attributes", &self.default_attributes)
            .field("content", &self.content)
            .field("assembled", &self.assembly.is_assembled())
            .finish()
    }
}

impl Element {
    /// Create an element with no attributes or content.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            content: Document::new(),
            attributes: None,
            default_attributes: None,
            assembly: Assembly::new(),
        }
    }

    /// Template the attributes are copied from on first access.
    #[must_use]
    pub fn with_default_attributes(mut self, defaults: Attributes) -> Self {
        self.default_attributes = Some(defaults);
        self
    }

    /// Install a hook that populates the element on first use.
    #[must_use]
    pub fn with_assembler(mut self, assembler: impl FnOnce(&mut Element) + 'static) -> Self {
        self.assembly.set_hook(Box::new(assembler));
        self
    }

    /// Tag name; empty for a bare fragment.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether the tag needs a closing tag, i.e. is not a void element.
    /// Case is ignored.
    #[must_use]
    pub fn wants_closing_tag(&self) -> bool {
        !VOID_ELEMENTS.contains(&self.tag.to_ascii_lowercase().as_str())
    }

    /// Attributes, created from the default template on first access.
    pub fn attributes(&mut self) -> &mut Attributes {
        let defaults = &self.default_attributes;
        self.attributes
            .get_or_insert_with(|| defaults.clone().unwrap_or_default())
    }

    /// Replace the attributes wholesale.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ensure_attributes`].
    pub fn set_attributes(&mut self, source: impl Into<AttributesSource>) -> Result<&mut Self> {
        self.attributes = Some(ensure_attributes(source)?);
        Ok(self)
    }

    /// Merge a value into the named attribute.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAttributeName` for an invalid name.
    pub fn attr(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<&mut Self> {
        self.attributes().add(name, value)?;
        Ok(self)
    }

    /// The wrapped content container.
    pub fn content(&mut self) -> &mut Document {
        self.ensure_assembled();
        &mut self.content
    }

    /// Whether the assembler has already run (or been skipped).
    #[must_use]
    pub fn is_assembled(&self) -> bool {
        self.assembly.is_assembled()
    }

    /// Run the assembler if it has not run yet.
    pub fn ensure_assembled(&mut self) {
        if let Some(assembler) = self.assembly.begin() {
            tracing::debug!(tag = %self.tag, "assembling element");
            assembler(self);
        }
    }

    /// See [`Document::add`].
    pub fn add(&mut self, content: impl Into<Content>) -> &mut Self {
        self.content().add(content);
        self
    }

    /// See [`Document::prepend`].
    pub fn prepend(&mut self, content: impl Into<Content>) -> &mut Self {
        self.content().prepend(content);
        self
    }

    /// See [`Document::push`].
    pub fn push(&mut self, content: impl Into<Content>) -> Option<NodeId> {
        self.content().push(content)
    }

    /// See [`Document::push_front`].
    pub fn push_front(&mut self, content: impl Into<Content>) -> Option<NodeId> {
        self.content().push_front(content)
    }

    /// See [`Document::add_existing`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if `id` is not part of this element.
    pub fn add_existing(&mut self, id: NodeId) -> Result<&mut Self> {
        self.content().add_existing(id)?;
        Ok(self)
    }

    /// See [`Document::prepend_existing`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if `id` is not part of this element.
    pub fn prepend_existing(&mut self, id: NodeId) -> Result<&mut Self> {
        self.content().prepend_existing(id)?;
        Ok(self)
    }

    /// See [`Document::remove`].
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.content().remove(id)
    }

    /// See [`Document::set_content`].
    pub fn set_content(&mut self, content: impl Into<Content>) -> &mut Self {
        self.content().set_content(content);
        self
    }

    /// See [`Document::count`].
    pub fn count(&mut self) -> usize {
        self.content().count()
    }

    /// Render the opening tag, attributes, content and closing tag.
    pub fn render(&mut self) -> String {
        self.ensure_assembled();
        if self.tag.is_empty() {
            return self.content.render();
        }

        let attributes = self
            .attributes
            .as_ref()
            .or(self.default_attributes.as_ref())
            .map(Attributes::render)
            .unwrap_or_default();
        let open = format!("<{} {attributes}", self.tag);
        let mut html = open.trim_end().to_owned();
        html.push('>');

        if !self.wants_closing_tag() {
            if self.content.count() > 0 {
                tracing::debug!(tag = %self.tag, "content of void element not rendered");
            }
            return html;
        }

        html.push_str(&self.content.render());
        html.push_str("</");
        html.push_str(&self.tag);
        html.push('>');
        html
    }
}

impl Render for Element {
    fn render(&mut self) -> String {
        Element::render(self)
    }
}
