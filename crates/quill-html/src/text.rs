//! Leaf text nodes.

use std::fmt;
use std::rc::Rc;

use crate::escape::encode;

/// A string leaf, escaped on render unless marked as already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    content: String,
    encoded: bool,
}

impl Text {
    /// Text that is escaped when rendered.
    #[must_use]
    pub fn new(content: impl ToString) -> Self {
        Self {
            content: content.to_string(),
            encoded: false,
        }
    }

    /// Text that is already valid HTML and rendered verbatim.
    #[must_use]
    pub fn raw(content: impl ToString) -> Self {
        Self {
            content: content.to_string(),
            encoded: true,
        }
    }

    /// The stored, unescaped content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the content is rendered verbatim.
    #[must_use]
    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    /// Render, escaping unless already encoded.
    #[must_use]
    pub fn render(&self) -> String {
        if self.encoded {
            self.content.clone()
        } else {
            encode(&self.content)
        }
    }
}

/// Text computed at render time.
///
/// The producer runs on every render, so values captured by the closure are
/// read late rather than when the node is built.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use quill_html::DeferredText;
///
/// let count = Rc::new(Cell::new(1));
/// let shared = Rc::clone(&count);
/// let text = DeferredText::new(move || format!("{} items", shared.get()));
/// count.set(3);
/// assert_eq!(text.render(), "3 items");
/// ```
#[derive(Clone)]
pub struct DeferredText {
    producer: Rc<dyn Fn() -> String>,
    encoded: bool,
}

impl fmt::Debug for DeferredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredText")
            .field("encoded", &self.encoded)
            .finish_non_exhaustive()
    }
}

impl DeferredText {
    /// Deferred text that is escaped when rendered.
    pub fn new(producer: impl Fn() -> String + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
            encoded: false,
        }
    }

    /// Deferred text whose output is rendered verbatim.
    pub fn raw(producer: impl Fn() -> String + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
            encoded: true,
        }
    }

    /// Whether the produced text is rendered verbatim.
    #[must_use]
    pub fn is_encoded(&self) -> bool {
        self.encoded
    }

    /// Invoke the producer and render its output.
    #[must_use]
    pub fn render(&self) -> String {
        let content = (self.producer)();
        if self.encoded { content } else { encode(&content) }
    }
}
