//! Programmatic HTML tree building with escaped rendering.
//!
//! This crate builds element trees in memory and serializes them to HTML
//! fragments on demand, without a templating engine.
//!
//! # Architecture
//!
//! - [`Document`]: ordered content container. Nodes live in an arena and are
//!   addressed by [`NodeId`] handles; one node instance may occupy several
//!   positions and is removed from all of them at once.
//! - [`Element`]: a document wrapped in a tag with [`Attributes`]. Void
//!   elements render without content or a closing tag.
//! - [`Attribute`] / [`Attributes`]: named values that merge as ordered sets,
//!   render booleans as bare names and skip absent values.
//! - [`Text`] / [`DeferredText`]: leaves, escaped unless marked raw.
//!   Deferred text is computed at render time.
//! - [`element`] and [`HtmlBuilder`]: construction entry points, the latter
//!   applying defaults from `quill.toml`.
//!
//! Containers accept an assembler hook that fills in default content on
//! first use. Rendering recurses depth-first and is not cached.
//!
//! # Example
//!
//! ```
//! use quill_html::{DeferredText, Element, element};
//!
//! let mut list = Element::new("ul");
//! list.content().set_separator("");
//! list.attr("class", ["menu", "top"]).unwrap();
//! list.add(element("li", (), "Home").unwrap());
//! list.add(element("li", [("class", "active")], "<Docs>").unwrap());
//! list.add(DeferredText::raw(|| "<li>Late</li>".to_owned()));
//!
//! assert_eq!(
//!     list.render(),
//!     r#"<ul class="menu top"><li>Home</li><li class="active">&lt;Docs&gt;</li><li>Late</li></ul>"#
//! );
//! ```
//!
//! Trees use `Rc` internally and are meant to be built and rendered on one
//! thread.

mod attribute;
mod attributes;
mod builder;
mod content;
mod document;
mod element;
mod error;
mod escape;
mod text;

pub use attribute::{Attribute, AttributeValue};
pub use attributes::{Attributes, AttributesSource, ensure_attributes};
pub use builder::{HtmlBuilder, element};
pub use content::{Content, Node, Render, ensure_content};
pub use document::{Document, NodeId};
pub use element::Element;
pub use error::{Error, ErrorKind, Result};
pub use escape::{decode, encode, encode_bytes};
pub use text::{DeferredText, Text};

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Attributes: Clone, std::fmt::Debug);
    static_assertions::assert_impl_all!(Error: std::error::Error, Send, Sync);
    static_assertions::assert_not_impl_any!(Document: Send, Sync);
    static_assertions::assert_not_impl_any!(Element: Send, Sync);
}
