use super::{BaseNode, ComponentNode, NodeType};

/// A page and the components loaded onto it, in declaration order
#[derive(Debug)]
pub struct PageNode {
    id: String,
    name: String,
    components: Vec<ComponentNode>,
    implicit: bool,
}

impl PageNode {
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            components: Vec::new(),
            implicit: false,
        }
    }

    /// Page created by the loader rather than read from a manifest
    pub(crate) fn implicit(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            implicit: true,
            ..Self::new(id, name)
        }
    }

    /// True for the page collecting components no manifest page lists
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[ComponentNode] {
        &self.components
    }

    pub fn component(&self, id: &str) -> Option<&ComponentNode> {
        self.components.iter().find(|component| component.id() == id)
    }

    pub(crate) fn component_mut(&mut self, id: &str) -> Option<&mut ComponentNode> {
        self.components.iter_mut().find(|component| component.id() == id)
    }

    pub(crate) fn push(&mut self, component: ComponentNode) {
        self.components.push(component);
    }

    pub(crate) fn take(&mut self, id: &str) -> Option<ComponentNode> {
        let index = self.components.iter().position(|component| component.id() == id)?;
        Some(self.components.remove(index))
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, ComponentNode> {
        self.components.drain(..)
    }
}

impl BaseNode for PageNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Page
    }
}
