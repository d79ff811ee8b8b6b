use opendesign_common::{LayerType, OctopusLayer};
use opendesign_engine::ComponentHandle;

use super::{BaseNode, LayerContainer, NodeType};

/// One layer of a component
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    id: String,
    layer_type: LayerType,
    name: Option<String>,
    component: ComponentHandle,
    parent_id: Option<String>,
    children: Vec<LayerNode>,
}

impl LayerNode {
    /// Mirror an octopus subtree; the mask, if any, becomes the first child
    pub(crate) fn from_octopus(layer: &OctopusLayer, component: ComponentHandle, parent_id: Option<&str>) -> Self {
        Self {
            id: layer.id.clone(),
            layer_type: layer.layer_type,
            name: layer.name.clone(),
            component,
            parent_id: parent_id.map(str::to_string),
            children: layer
                .children()
                .map(|child| LayerNode::from_octopus(child, component, Some(&layer.id)))
                .collect(),
        }
    }

    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Persistent handle of the owning component
    pub fn component(&self) -> ComponentHandle {
        self.component
    }

    /// `None` for a component's root layer
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn children(&self) -> &[LayerNode] {
        &self.children
    }

    pub fn find(&self, id: &str) -> Option<&LayerNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut LayerNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Ids in this subtree, depth first
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: LayerNode) {
        self.children.insert(index, child);
    }

    pub(crate) fn push_child(&mut self, child: LayerNode) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Remove a strict descendant and return its subtree
    pub(crate) fn detach(&mut self, id: &str) -> Option<LayerNode> {
        if let Some(index) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(index));
        }
        self.children.iter_mut().find_map(|child| child.detach(id))
    }
}

impl BaseNode for LayerNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Layer
    }
}

impl LayerContainer for LayerNode {
    fn layers(&self) -> &[LayerNode] {
        &self.children
    }
}
