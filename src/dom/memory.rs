//! In-memory DOM
//!
//! Arena-backed node tree used by native callers and by the test suite. Nodes
//! are never freed; a removed node simply loses its parent, which mirrors how
//! browser nodes stay alive while something holds a reference to them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::{Dom, DomError};

/// Handle into a [`MemoryDom`] arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        classes: Vec<String>,
        style: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena tree with a `body` root standing in for the document
#[derive(Clone, Debug)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    body: NodeId,
    tops: HashMap<NodeId, f64>,
    viewport_height: f64,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let body = NodeData {
            kind: NodeKind::Element {
                tag: "body".to_string(),
                attributes: BTreeMap::new(),
                classes: Vec::new(),
                style: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            tops: HashMap::new(),
            viewport_height: 800.0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Pretend layout: place the node's top edge `top` px below the viewport top
    pub fn set_bounding_top(&mut self, node: NodeId, top: f64) {
        self.tops.insert(node, top);
    }

    /// Build `<tag>text</tag>` and append it to `parent`
    pub fn append_element_with_text(
        &mut self,
        parent: NodeId,
        tag: &str,
        text: &str,
    ) -> Result<NodeId, DomError> {
        let element = self.create_element(tag)?;
        let text = self.create_text(text)?;
        self.append_child(&element, &text)?;
        self.append_child(&parent, &element)?;
        Ok(element)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Every element under `root` (excluding `root`) carrying `class`
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_class(root, class, &mut found);
        found
    }

    fn collect_class(&self, node: NodeId, class: &str, found: &mut Vec<NodeId>) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        for &child in &data.children {
            if self.has_class(&child, class) {
                found.push(child);
            }
            self.collect_class(child, class, found);
        }
    }

    /// Serialize the subtree. Attributes, classes and inline styles are
    /// emitted in sorted order so two structurally equal trees print equal.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element {
                tag,
                attributes,
                classes,
                style,
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
                }
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, value));
                }
                if !style.is_empty() {
                    let css: Vec<String> =
                        style.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                    out.push_str(&format!(" style=\"{}\"", css.join("; ")));
                }
                out.push('>');
                for &child in &data.children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn data(&self, node: &NodeId) -> Result<&NodeData, DomError> {
        self.nodes
            .get(node.0)
            .ok_or_else(|| DomError::UnknownNode(node.to_string()))
    }

    fn data_mut(&mut self, node: &NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| DomError::UnknownNode(node.to_string()))
    }

    fn element_parts_mut(
        &mut self,
        node: &NodeId,
    ) -> Result<
        (
            &mut BTreeMap<String, String>,
            &mut Vec<String>,
            &mut BTreeMap<String, String>,
        ),
        DomError,
    > {
        let label = node.to_string();
        match &mut self.data_mut(node)?.kind {
            NodeKind::Element {
                attributes,
                classes,
                style,
                ..
            } => Ok((attributes, classes, style)),
            NodeKind::Text(_) => Err(DomError::NotAnElement(label)),
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn is_attached(&self, node: &NodeId) -> bool {
        self.is_ancestor_or_self(self.body, *node)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        self.nodes.push(NodeData {
            kind: NodeKind::Element {
                tag: tag.to_string(),
                attributes: BTreeMap::new(),
                classes: Vec::new(),
                style: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, DomError> {
        self.nodes.push(NodeData {
            kind: NodeKind::Text(text.to_string()),
            parent: None,
            children: Vec::new(),
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn clone_shallow(&mut self, node: &NodeId) -> Result<NodeId, DomError> {
        let kind = self.data(node)?.kind.clone();
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        self.tag(*node).map(str::to_string)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.nodes.get(parent.0)?.children;
        let pos = siblings.iter().position(|c| c == node)?;
        siblings.get(pos + 1).copied()
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn element_children(&self, node: &NodeId) -> Vec<NodeId> {
        self.child_nodes(node)
            .into_iter()
            .filter(|c| self.tag(*c).is_some())
            .collect()
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), DomError> {
        if let NodeKind::Text(_) = self.data(parent)?.kind {
            return Err(DomError::NotAnElement(parent.to_string()));
        }
        self.data(child)?;
        if self.is_ancestor_or_self(*child, *parent) {
            return Err(DomError::Hierarchy(format!(
                "cannot insert {} into its own subtree {}",
                child, parent
            )));
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(*parent) {
                return Err(DomError::NotAChild {
                    parent: parent.to_string(),
                    child: reference.to_string(),
                });
            }
        }

        self.detach(child)?;

        let index = match reference {
            Some(reference) => self
                .data(parent)?
                .children
                .iter()
                .position(|c| c == reference)
                .ok_or_else(|| DomError::NotAChild {
                    parent: parent.to_string(),
                    child: reference.to_string(),
                })?,
            None => self.data(parent)?.children.len(),
        };
        self.data_mut(parent)?.children.insert(index, *child);
        self.data_mut(child)?.parent = Some(*parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let siblings = &mut self.data_mut(parent)?.children;
        let pos = siblings
            .iter()
            .position(|c| c == child)
            .ok_or_else(|| DomError::NotAChild {
                parent: parent.to_string(),
                child: child.to_string(),
            })?;
        siblings.remove(pos);
        self.data_mut(child)?.parent = None;
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).cloned(),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let (attributes, _, _) = self.element_parts_mut(node)?;
        attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        let (attributes, _, _) = self.element_parts_mut(node)?;
        attributes.remove(name);
        Ok(())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        let (_, classes, _) = self.element_parts_mut(node)?;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Element { classes, .. }) => classes.iter().any(|c| c == class),
            _ => false,
        }
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let (_, _, style) = self.element_parts_mut(node)?;
        style.insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { style, .. } => style.get(property).cloned(),
            NodeKind::Text(_) => None,
        }
    }

    fn text_content(&self, node: &NodeId) -> String {
        let Some(data) = self.nodes.get(node.0) else {
            return String::new();
        };
        match &data.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element { .. } => data
                .children
                .iter()
                .map(|c| self.text_content(c))
                .collect(),
        }
    }

    fn bounding_top(&self, node: &NodeId) -> Option<f64> {
        if !self.is_attached(node) {
            return None;
        }
        Some(self.tops.get(node).copied().unwrap_or(f64::INFINITY))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
