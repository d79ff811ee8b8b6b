//! # Node Tree
//!
//! Host-side mirror of the engine's document:
//!
//! ```text
//! DocumentNode ─ PageNode* ─ ComponentNode* ─ LayerNode (root) ─ LayerNode*
//! ```
//!
//! Every layer of a component carries the component's persistent engine
//! handle. Layers point at their parent by id only; ownership runs strictly
//! downwards.

mod component;
mod cursor;
mod document;
mod layer;
mod page;

pub use component::{ComponentNode, InsertPosition};
pub use cursor::LayerCursor;
pub use document::{ComponentSelection, DocumentNode, OTHER_PAGE_ID};
pub use layer::LayerNode;
pub use page::PageNode;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Page,
    Component,
    Layer,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Document => "document",
            NodeType::Page => "page",
            NodeType::Component => "component",
            NodeType::Layer => "layer",
        };
        f.write_str(name)
    }
}

/// Anything in the tree that has a stable id
pub trait BaseNode {
    fn id(&self) -> &str;
    fn node_type(&self) -> NodeType;
}

/// Tree members that own layers
pub trait LayerContainer {
    fn layers(&self) -> &[LayerNode];

    /// Depth-first lookup in this container's subtree
    fn find_layer(&self, id: &str) -> Option<&LayerNode> {
        self.layers().iter().find_map(|layer| layer.find(id))
    }

    fn contains_layer(&self, id: &str) -> bool {
        self.find_layer(id).is_some()
    }
}

/// Borrowed view of any node
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Document(&'a DocumentNode),
    Page(&'a PageNode),
    Component(&'a ComponentNode),
    Layer(&'a LayerNode),
}

impl<'a> Node<'a> {
    pub fn as_base(&self) -> &'a dyn BaseNode {
        match *self {
            Node::Document(node) => node,
            Node::Page(node) => node,
            Node::Component(node) => node,
            Node::Layer(node) => node,
        }
    }

    pub fn id(&self) -> &'a str {
        self.as_base().id()
    }

    pub fn node_type(&self) -> NodeType {
        self.as_base().node_type()
    }

    /// Human-facing name, when the node has one
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Node::Document(_) => None,
            Node::Page(page) => Some(page.name()),
            Node::Component(component) => Some(component.name()),
            Node::Layer(layer) => layer.name(),
        }
    }

    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Node::Document(document) => document.pages().iter().map(Node::Page).collect(),
            Node::Page(page) => page.components().iter().map(Node::Component).collect(),
            Node::Component(component) => component.layers().iter().map(Node::Layer).collect(),
            Node::Layer(layer) => layer.children().iter().map(Node::Layer).collect(),
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Layer(layer) => write!(f, "{} {}", layer.layer_type(), layer.id())?,
            other => write!(f, "{} {}", other.node_type(), other.id())?,
        }
        if let Some(name) = self.name() {
            write!(f, " \"{name}\"")?;
        }
        Ok(())
    }
}
