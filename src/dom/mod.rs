//! Document seam: everything the site logic needs from a page.
//!
//! Implementors provide tree primitives; queries are default methods that
//! walk the current tree on every call. Nothing in the crate caches node
//! handles across a synchronization pass, because regions of the page (the
//! navigation bar) appear after the first pass has already run.
//!
//! Text goes in through [`Document::set_text`] only. There is no markup
//! parsing path in this trait.

mod memory;
mod selector;

pub use memory::{ElementSpec, MemoryDocument};
pub use selector::{Compound, Selector, SelectorError};

use std::fmt;
use thiserror::Error;

/// Handle to an element of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0} is no longer attached to the document")]
    StaleNode(NodeId),

    #[error("node {0} has no parent")]
    NoParent(NodeId),

    #[error("cannot move node {node} relative to its own descendant {reference}")]
    Cycle { node: NodeId, reference: NodeId },
}

/// Inline style that stops the page behind an overlay from scrolling.
pub const SCROLL_LOCK_STYLE: &str = "overflow: hidden";

pub trait Document {
    // ==================== Tree Primitives ====================

    /// The document element (`<html>`).
    fn root(&self) -> NodeId;

    /// Lowercase tag name; `None` for detached nodes.
    fn tag(&self, node: NodeId) -> Option<String>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in document order; empty for detached nodes.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError>;

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError>;

    /// Text content of the node and its descendants.
    fn text(&self, node: NodeId) -> Option<String>;

    /// Replace the node's content with plain text.
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError>;

    /// Create a new element as the last child of `parent`.
    fn create_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError>;

    /// Detach a node (and its subtree) from the document.
    fn remove_node(&mut self, node: NodeId) -> Result<(), DomError>;

    /// Move `node` so that it directly precedes `reference`.
    fn insert_before(&mut self, node: NodeId, reference: NodeId) -> Result<(), DomError>;

    /// Move `node` to be the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError>;

    /// Build `spec` as the last child of `parent`, returning the new subtree root.
    fn append_fragment(&mut self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId, DomError> {
        let node = self.create_element(parent, &spec.tag)?;
        if let Some(id) = &spec.id {
            self.set_attribute(node, "id", id)?;
        }
        for (name, value) in &spec.attributes {
            self.set_attribute(node, name, value)?;
        }
        for class in &spec.classes {
            self.add_class(node, class)?;
        }
        if !spec.text.is_empty() {
            self.set_text(node, &spec.text)?;
        }
        for child in &spec.children {
            self.append_fragment(node, child)?;
        }
        Ok(node)
    }

    /// Serializable copy of the whole tree as it stands.
    fn snapshot(&self) -> ElementSpec;

    // ==================== Queries ====================

    fn is_attached(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        if compound.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if let Some(id) = &compound.id {
            if self.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        compound.classes.iter().all(|class| self.has_class(node, class))
            && compound
                .attributes
                .iter()
                .all(|name| self.attribute(node, name).is_some())
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.alternatives().iter().any(|chain| {
            let Some((last, ancestors)) = chain.split_last() else {
                return false;
            };
            if !self.matches_compound(node, last) {
                return false;
            }
            // Descendant combinators only, so a greedy walk up is exact.
            let mut current = self.parent(node);
            for compound in ancestors.iter().rev() {
                loop {
                    match current {
                        None => return false,
                        Some(ancestor) => {
                            current = self.parent(ancestor);
                            if self.matches_compound(ancestor, compound) {
                                break;
                            }
                        }
                    }
                }
            }
            true
        })
    }

    /// Descendants of `scope` (not `scope` itself) matching, in document order.
    fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.matches(node, selector) {
                found.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        found
    }

    /// Every element matching, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let root = self.root();
        let mut found = self.query_within(root, selector);
        if self.matches(root, selector) {
            found.insert(0, root);
        }
        found
    }

    fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// The node itself or its nearest ancestor matching.
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.matches(candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Parse and query in one step.
    fn select_all(&self, css: &str) -> Result<Vec<NodeId>, SelectorError> {
        Ok(self.query_all(&Selector::parse(css)?))
    }

    fn select(&self, css: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query(&Selector::parse(css)?))
    }

    // ==================== Conveniences ====================

    fn toggle_class(&mut self, node: NodeId, class: &str) -> Result<bool, DomError> {
        if self.has_class(node, class) {
            self.remove_class(node, class)?;
            Ok(false)
        } else {
            self.add_class(node, class)?;
            Ok(true)
        }
    }

    fn set_class(&mut self, node: NodeId, class: &str, present: bool) -> Result<(), DomError> {
        if present {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    /// The `lang` attribute of the document element.
    fn lang(&self) -> Option<String> {
        self.attribute(self.root(), "lang")
    }

    fn set_lang(&mut self, code: &str) -> Result<(), DomError> {
        let root = self.root();
        self.set_attribute(root, "lang", code)
    }

    /// The first `<body>` element.
    fn body(&self) -> Option<NodeId> {
        let root = self.root();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.tag(node).as_deref() == Some("body") {
                return Some(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        None
    }

    fn scroll_locked(&self) -> bool {
        self.body()
            .and_then(|body| self.attribute(body, "style"))
            .is_some_and(|style| style == SCROLL_LOCK_STYLE)
    }

    /// Lock or release page scrolling behind an overlay.
    fn set_scroll_locked(&mut self, locked: bool) -> Result<(), DomError> {
        let Some(body) = self.body() else {
            return Ok(());
        };
        if locked {
            self.set_attribute(body, "style", SCROLL_LOCK_STYLE)
        } else {
            self.remove_attribute(body, "style")
        }
    }
}
