//! Browser DOM backend built on `web-sys`

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

use super::{Dom, DomError};

fn js_error(e: JsValue) -> DomError {
    DomError::Js(format!("{:?}", e))
}

fn as_element(node: &Node) -> Result<&Element, DomError> {
    node.dyn_ref::<Element>()
        .ok_or_else(|| DomError::NotAnElement(node.node_name()))
}

/// [`Dom`] over the live page
#[derive(Clone, Debug)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Bind to `window.document`
    pub fn from_window() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or_else(|| DomError::Js("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Js("no document".to_string()))?;
        Ok(Self::new(document))
    }
}

impl Dom for WebDom {
    type Node = Node;

    fn is_attached(&self, node: &Node) -> bool {
        node.is_connected()
    }

    fn create_element(&mut self, tag: &str) -> Result<Node, DomError> {
        self.document
            .create_element(tag)
            .map(Node::from)
            .map_err(js_error)
    }

    fn create_text(&mut self, text: &str) -> Result<Node, DomError> {
        Ok(self.document.create_text_node(text).into())
    }

    fn clone_shallow(&mut self, node: &Node) -> Result<Node, DomError> {
        node.clone_node().map_err(js_error)
    }

    fn tag_name(&self, node: &Node) -> Option<String> {
        node.dyn_ref::<Element>()
            .map(|e| e.tag_name().to_ascii_lowercase())
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn child_nodes(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn element_children(&self, node: &Node) -> Vec<Node> {
        let Some(element) = node.dyn_ref::<Element>() else {
            return Vec::new();
        };
        let children = element.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(Node::from)
            .collect()
    }

    fn insert_before(
        &mut self,
        parent: &Node,
        child: &Node,
        reference: Option<&Node>,
    ) -> Result<(), DomError> {
        parent
            .insert_before(child, reference)
            .map(|_| ())
            .map_err(js_error)
    }

    fn remove_child(&mut self, parent: &Node, child: &Node) -> Result<(), DomError> {
        parent.remove_child(child).map(|_| ()).map_err(js_error)
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        as_element(node)?.set_attribute(name, value).map_err(js_error)
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) -> Result<(), DomError> {
        as_element(node)?.remove_attribute(name).map_err(js_error)
    }

    fn add_class(&mut self, node: &Node, class: &str) -> Result<(), DomError> {
        as_element(node)?.class_list().add_1(class).map_err(js_error)
    }

    fn has_class(&self, node: &Node, class: &str) -> bool {
        node.dyn_ref::<Element>()
            .map(|e| e.class_list().contains(class))
            .unwrap_or(false)
    }

    fn set_style(&mut self, node: &Node, property: &str, value: &str) -> Result<(), DomError> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::NotAnElement(node.node_name()))?;
        element
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn style(&self, node: &Node, property: &str) -> Option<String> {
        let value = node
            .dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value(property)
            .ok()?;
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn bounding_top(&self, node: &Node) -> Option<f64> {
        if !node.is_connected() {
            return None;
        }
        Some(node.dyn_ref::<Element>()?.get_bounding_client_rect().top())
    }

    fn viewport_height(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }
}
