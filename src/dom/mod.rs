//! DOM abstraction
//!
//! The reveal pipeline only talks to the page through the [`Dom`] trait, so the
//! same orchestration runs against the browser (`web`) and against an
//! in-memory tree (`memory`) in native tests.

pub mod memory;
pub mod web;

pub use memory::{MemoryDom, NodeId};
pub use web::WebDom;

use thiserror::Error;

/// Failures reported by a DOM backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomError {
    /// The node handle does not refer to a live node
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// The operation needs an element but got a text node
    #[error("Not an element: {0}")]
    NotAnElement(String),

    /// `child` is not a child of the given parent
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    /// Inserting would make a node its own ancestor
    #[error("Hierarchy error: {0}")]
    Hierarchy(String),

    /// Error thrown by the browser
    #[error("JS error: {0}")]
    Js(String),
}

/// Minimal tree API needed to wrap lines, style them and restore them.
pub trait Dom {
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// True if the node is reachable from the document root
    fn is_attached(&self, node: &Self::Node) -> bool;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    fn create_text(&mut self, text: &str) -> Result<Self::Node, DomError>;

    /// Copy of `node` with its attributes, classes and styles but no children
    fn clone_shallow(&mut self, node: &Self::Node) -> Result<Self::Node, DomError>;

    /// Lowercase tag name, or `None` for text nodes
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// All child nodes, text included, in document order
    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Element children only, in document order
    fn element_children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None`. A child that already has a parent is moved.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), DomError>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), DomError>;

    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Set an inline style property (`background-color`, `opacity`, ...)
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;

    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;

    /// Concatenated text of the subtree
    fn text_content(&self, node: &Self::Node) -> String;

    /// Distance in px from the viewport top to the node's top edge
    fn bounding_top(&self, node: &Self::Node) -> Option<f64>;

    fn viewport_height(&self) -> f64;

    /// Detach `node` from whatever parent it has. No-op for detached nodes.
    fn detach(&mut self, node: &Self::Node) -> Result<(), DomError> {
        match self.parent(node) {
            Some(parent) => self.remove_child(&parent, node),
            None => Ok(()),
        }
    }
}
