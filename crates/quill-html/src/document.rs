//! Ordered content containers.
//!
//! A [`Document`] owns its nodes in an arena. Each node instance gets a
//! [`NodeId`] handle that stays valid until the node is removed. Handles are
//! never reused within a document, and removed nodes are freed. The
//! same instance may be placed at several positions. The content index maps
//! every handle to the positions it occupies so that removing an instance
//! removes all of its occurrences.
//!
//! # Assembly
//!
//! A document may be given an assembler: a hook that fills in default content
//! the first time the document is touched (add, prepend, remove, count or
//! render). It runs at most once.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::content::{Content, Node, Render};
use crate::error::{Error, Result};

/// Handle to a node instance inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblyState {
    Unassembled,
    Assembled,
}

/// One-shot lazy initialization shared by documents and elements.
pub(crate) struct Assembly<T> {
    state: AssemblyState,
    hook: Option<Box<dyn FnOnce(&mut T)>>,
}

impl<T> Assembly<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: AssemblyState::Unassembled,
            hook: None,
        }
    }

    pub(crate) fn set_hook(&mut self, hook: Box<dyn FnOnce(&mut T)>) {
        self.hook = Some(hook);
    }

    pub(crate) fn is_assembled(&self) -> bool {
        self.state == AssemblyState::Assembled
    }

    /// Mark as assembled, handing out the hook on the first call only.
    pub(crate) fn begin(&mut self) -> Option<Box<dyn FnOnce(&mut T)>> {
        if self.is_assembled() {
            return None;
        }
        self.state = AssemblyState::Assembled;
        self.hook.take()
    }
}

/// Ordered list of renderable nodes joined by a separator on render.
///
/// # Example
///
/// ```
/// use quill_html::{Document, Text};
///
/// let mut doc = Document::with_separator(", ");
/// doc.add("z");
/// doc.prepend(vec!["x", "y"]);
/// let bold = doc.push(Text::raw("<b>!</b>")).unwrap();
/// doc.add_existing(bold).unwrap();
/// assert_eq!(doc.render(), "x, y, z, <b>!</b>, <b>!</b>");
///
/// doc.remove(bold);
/// assert_eq!(doc.count(), 3);
/// ```
pub struct Document {
    arena: BTreeMap<NodeId, Node>,
    next_id: usize,
    content: Vec<NodeId>,
    content_index: BTreeMap<NodeId, BTreeSet<usize>>,
    separator: String,
    assembly: Assembly<Document>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("content", &self.content)
            .field("separator", &self.separator)
            .field("assembled", &self.assembly.is_assembled())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a newline separator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_separator("\n")
    }

    /// Create an empty document with a custom separator.
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            arena: BTreeMap::new(),
            next_id: 0,
            content: Vec::new(),
            content_index: BTreeMap::new(),
            separator: separator.into(),
            assembly: Assembly::new(),
        }
    }

    /// Install a hook that populates the document on first use.
    #[must_use]
    pub fn with_assembler(mut self, assembler: impl FnOnce(&mut Document) + 'static) -> Self {
        self.assembly.set_hook(Box::new(assembler));
        self
    }

    /// Separator inserted between rendered children.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Change the separator.
    pub fn set_separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.separator = separator.into();
        self
    }

    /// Whether the assembler has already run (or been skipped).
    #[must_use]
    pub fn is_assembled(&self) -> bool {
        self.assembly.is_assembled()
    }

    /// Run the assembler if it has not run yet.
    pub fn ensure_assembled(&mut self) {
        if let Some(assembler) = self.assembly.begin() {
            tracing::debug!("assembling document");
            assembler(self);
        }
    }

    /// Append content. A list is added item by item; a list nested inside
    /// it becomes a nested document. Empty content is ignored.
    pub fn add(&mut self, content: impl Into<Content>) -> &mut Self {
        self.ensure_assembled();
        match content.into() {
            Content::List(items) => {
                for item in items {
                    self.push(item);
                }
            }
            other => {
                self.push(other);
            }
        }
        self
    }

    /// Insert content at the front. A list keeps its order.
    pub fn prepend(&mut self, content: impl Into<Content>) -> &mut Self {
        self.ensure_assembled();
        match content.into() {
            Content::List(items) => {
                for item in items.into_iter().rev() {
                    self.push_front(item);
                }
            }
            other => {
                self.push_front(other);
            }
        }
        self
    }

    /// Append a single node and return its handle.
    ///
    /// Unlike [`add`](Self::add), a list becomes one nested document.
    /// Returns `None` for empty content.
    pub fn push(&mut self, content: impl Into<Content>) -> Option<NodeId> {
        self.ensure_assembled();
        let node = content.into().into_node(&self.separator)?;
        let id = self.alloc(node);
        self.append_position(id);
        Some(id)
    }

    /// Insert a single node at the front and return its handle.
    pub fn push_front(&mut self, content: impl Into<Content>) -> Option<NodeId> {
        self.ensure_assembled();
        let node = content.into().into_node(&self.separator)?;
        let id = self.alloc(node);
        self.prepend_position(id);
        Some(id)
    }

    /// Append another occurrence of a node already in this document.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if `id` is not part of this document.
    pub fn add_existing(&mut self, id: NodeId) -> Result<&mut Self> {
        self.ensure_assembled();
        self.check_known(id)?;
        self.append_position(id);
        Ok(self)
    }

    /// Insert another occurrence of a node already in this document at the
    /// front.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownNode` if `id` is not part of this document.
    pub fn prepend_existing(&mut self, id: NodeId) -> Result<&mut Self> {
        self.ensure_assembled();
        self.check_known(id)?;
        self.prepend_position(id);
        Ok(self)
    }

    /// Remove every occurrence of the node and return it.
    ///
    /// Remaining positions are renumbered. Returns `None` if the node is not
    /// part of this document.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.ensure_assembled();
        let positions = self.content_index.remove(&id)?;

        let mut position = 0;
        self.content.retain(|_| {
            let keep = !positions.contains(&position);
            position += 1;
            keep
        });
        self.reindex();

        tracing::debug!(node = %id, occurrences = positions.len(), "removed node");
        self.arena.remove(&id)
    }

    /// Replace all content.
    ///
    /// The assembler runs first if it has not yet, so its output is
    /// replaced as well.
    pub fn set_content(&mut self, content: impl Into<Content>) -> &mut Self {
        self.ensure_assembled();
        self.arena.clear();
        self.content.clear();
        self.content_index.clear();
        self.add(content)
    }

    /// Number of content positions.
    pub fn count(&mut self) -> usize {
        self.ensure_assembled();
        self.content.len()
    }

    /// Handles in content order, one per position.
    #[must_use]
    pub fn handles(&self) -> &[NodeId] {
        &self.content
    }

    /// Positions occupied by a node, in ascending order.
    #[must_use]
    pub fn positions(&self, id: NodeId) -> Vec<usize> {
        self.content_index
            .get(&id)
            .map(|positions| positions.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Borrow a node by handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(&id)
    }

    /// Mutably borrow a node by handle.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(&id)
    }

    /// Render every position in order, joined by the separator.
    pub fn render(&mut self) -> String {
        self.ensure_assembled();
        let mut parts = Vec::with_capacity(self.content.len());
        for position in 0..self.content.len() {
            let id = self.content[position];
            if let Some(node) = self.arena.get_mut(&id) {
                tracing::trace!(node = %id, position, "rendering node");
                parts.push(node.render());
            }
        }
        parts.join(self.separator.as_str())
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.arena.insert(id, node);
        id
    }

    fn check_known(&self, id: NodeId) -> Result<()> {
        if self.get(id).is_none() {
            return Err(Error::UnknownNode(id));
        }
        Ok(())
    }

    fn append_position(&mut self, id: NodeId) {
        let position = self.content.len();
        self.content.push(id);
        self.content_index.entry(id).or_default().insert(position);
    }

    fn prepend_position(&mut self, id: NodeId) {
        for positions in self.content_index.values_mut() {
            *positions = positions.iter().map(|p| p + 1).collect();
        }
        self.content.insert(0, id);
        self.content_index.entry(id).or_default().insert(0);
    }

    /// Rebuild the content index from scratch.
    fn reindex(&mut self) {
        self.content_index.clear();
        for (position, id) in self.content.iter().enumerate() {
            self.content_index.entry(*id).or_default().insert(position);
        }
    }
}

impl Render for Document {
    fn render(&mut self) -> String {
        Document::render(self)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::element::Element;
    use crate::error::ErrorKind;
    use crate::text::{DeferredText, Text};

    #[test]
    fn test_add_and_render() {
        let mut doc = Document::new();
        doc.add("a").add(Text::raw("<hr>")).add(1);
        assert_eq!(doc.count(), 3);
        assert_eq!(doc.render(), "a\n<hr>\n1");
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut doc = Document::new();
        doc.add(()).add(None::<&str>);
        assert_eq!(doc.count(), 0);
        assert_eq!(doc.render(), "");
    }

    #[test]
    fn test_add_list_flattens_one_level() {
        let mut doc = Document::with_separator("|");
        doc.add(Content::List(vec![
            "a".into(),
            Content::from(vec!["b", "c"]),
            "d".into(),
        ]));
        assert_eq!(doc.count(), 3);
        assert_eq!(doc.render(), "a|b|c|d");

        let nested = doc.handles()[1];
        let Some(Node::Document(inner)) = doc.get_mut(nested) else {
            panic!("expected nested document");
        };
        assert_eq!(inner.separator(), "|");
        assert_eq!(inner.count(), 2);
    }

    #[test]
    fn test_prepend_list_keeps_order() {
        let mut doc = Document::with_separator(",");
        doc.add("z");
        doc.prepend(vec!["x", "y"]);
        assert_eq!(doc.render(), "x,y,z");
    }

    #[test]
    fn test_prepend_shifts_index() {
        let mut doc = Document::new();
        let a = doc.push("a").unwrap();
        let b = doc.push("b").unwrap();
        doc.add_existing(a).unwrap();
        let front = doc.push_front("front").unwrap();

        assert_eq!(doc.positions(front), vec![0]);
        assert_eq!(doc.positions(a), vec![1, 3]);
        assert_eq!(doc.positions(b), vec![2]);
    }

    #[test]
    fn test_remove_all_occurrences() {
        let mut doc = Document::new();
        let node = doc.push("twice").unwrap();
        doc.add_existing(node).unwrap();
        assert_eq!(doc.count(), 2);

        let removed = doc.remove(node);
        assert!(matches!(removed, Some(Node::Text(ref t)) if t.content() == "twice"));
        assert_eq!(doc.count(), 0);
        assert!(doc.get(node).is_none());
        assert!(doc.remove(node).is_none());
    }

    #[test]
    fn test_remove_reindexes_remaining() {
        let mut doc = Document::with_separator(" ");
        let a = doc.push("a").unwrap();
        let b = doc.push("b").unwrap();
        doc.add_existing(a).unwrap();
        let c = doc.push("c").unwrap();
        doc.add_existing(b).unwrap();

        doc.remove(a);
        assert_eq!(doc.render(), "b c b");
        assert_eq!(doc.positions(b), vec![0, 2]);
        assert_eq!(doc.positions(c), vec![1]);

        doc.prepend("p");
        assert_eq!(doc.positions(b), vec![1, 3]);
        assert_eq!(doc.render(), "p b c b");
    }

    #[test]
    fn test_equal_nodes_keep_identity() {
        let mut doc = Document::new();
        let first = doc.push("same").unwrap();
        let second = doc.push("same").unwrap();
        doc.remove(first);
        assert_eq!(doc.count(), 1);
        assert_eq!(doc.handles(), &[second]);
    }

    #[test]
    fn test_existing_unknown_handle() {
        let mut other = Document::new();
        other.push("x");
        let foreign = other.push("y").unwrap();

        let mut doc = Document::new();
        let err = doc.add_existing(foreign).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(doc.prepend_existing(foreign).is_err());
    }

    #[test]
    fn test_set_content_replaces() {
        let mut doc = Document::with_separator(" ");
        let old = doc.push("old").unwrap();
        doc.set_content(vec!["new", "content"]);
        assert_eq!(doc.render(), "new content");
        assert!(doc.positions(old).is_empty());
    }

    #[test]
    fn test_get_mut_updates_nested_element() {
        let mut doc = Document::new();
        let id = doc.push(Element::new("p")).unwrap();
        doc.get_mut(id)
            .and_then(Node::as_element_mut)
            .unwrap()
            .add("late");
        assert_eq!(doc.render(), "<p>late</p>");
    }

    #[test]
    fn test_assembler_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let mut doc = Document::with_separator(" ").with_assembler(move |doc| {
            counter.set(counter.get() + 1);
            doc.add("default");
        });
        assert!(!doc.is_assembled());

        assert_eq!(doc.render(), "default");
        assert_eq!(doc.render(), "default");
        doc.add("more");
        assert_eq!(doc.render(), "default more");
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_assembler_runs_before_add() {
        let mut doc = Document::with_separator(",").with_assembler(|doc| {
            doc.add("first");
        });
        doc.add("second");
        assert!(doc.is_assembled());
        assert_eq!(doc.render(), "first,second");
    }

    #[test]
    fn test_set_content_replaces_assembled_content() {
        let mut doc = Document::new().with_assembler(|doc| {
            doc.add("default");
        });
        doc.set_content("only");
        assert_eq!(doc.render(), "only");
    }

    #[test]
    fn test_assembler_runs_before_prepend() {
        let mut doc = Document::with_separator(",").with_assembler(|doc| {
            doc.add("default");
        });
        doc.prepend("first");
        assert!(doc.is_assembled());
        assert_eq!(doc.render(), "first,default");
    }

    #[test]
    fn test_assembler_runs_before_remove() {
        let mut doc = Document::with_separator(",").with_assembler(|doc| {
            doc.add("default");
        });
        let mut other = Document::new();
        let foreign = other.push("x").unwrap();

        assert!(doc.remove(foreign).is_none());
        assert!(doc.is_assembled());
        assert_eq!(doc.render(), "default");
    }

    #[test]
    fn test_assembler_runs_before_count() {
        let mut doc = Document::new().with_assembler(|doc| {
            doc.add(vec!["a", "b"]);
        });
        assert_eq!(doc.count(), 2);
        assert!(doc.is_assembled());
    }

    #[test]
    fn test_repopulating_frees_nodes() {
        let mut doc = Document::new();
        let mut last = None;
        for i in 0..1000 {
            doc.set_content(vec![i.to_string(), "x".to_owned()]);
            let id = doc.push("tail").unwrap();
            doc.remove(id);
            last = Some(id);
        }
        assert_eq!(doc.count(), 2);
        assert_eq!(doc.arena.len(), 2);

        // Handles of freed nodes stay dead.
        let stale = last.unwrap();
        let fresh = doc.push("new").unwrap();
        assert_ne!(fresh, stale);
        assert!(doc.get(stale).is_none());
    }

    #[test]
    fn test_render_not_cached() {
        let n = Rc::new(Cell::new(0));
        let shared = Rc::clone(&n);
        let mut doc = Document::new();
        doc.add(DeferredText::new(move || shared.get().to_string()));
        assert_eq!(doc.render(), "0");
        n.set(5);
        assert_eq!(doc.render(), "5");
    }

    #[test]
    fn test_node_id_display() {
        let mut doc = Document::new();
        let id = doc.push("x").unwrap();
        assert_eq!(id.to_string(), "#0");
    }
}
