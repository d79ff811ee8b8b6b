//! # Document Node
//!
//! Root of the node tree. Owns every engine component it creates and
//! destroys them again when dropped.
//!
//! ## Lifecycle
//!
//! ```text
//! OctopusFile ─ load ─► DocumentNode ─ edit ─► manifest() ─► Manifest
//!                            │
//!                           drop ─► destroy_component (each component)
//! ```

use opendesign_common::{LayerType, OctopusComponent, OctopusLayer};
use opendesign_engine::{create_component, NativeEngine};
use opendesign_import::OctopusFile;
use opendesign_manifest::{ChildRef, Manifest, ManifestComponent, ManifestPage};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::{BaseNode, ComponentNode, LayerContainer, LayerCursor, Node, NodeType, PageNode};
use crate::EditorError;

/// Preferred id of the implicit page holding components no page lists.
///
/// A suffix is added when a manifest page already uses it.
pub const OTHER_PAGE_ID: &str = "other";
const OTHER_PAGE_NAME: &str = "Other";
const DOCUMENT_ID: &str = "document";

/// Which components of a file to instantiate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComponentSelection {
    #[default]
    All,
    Single(String),
}

impl ComponentSelection {
    fn includes(&self, component_id: &str) -> bool {
        match self {
            ComponentSelection::All => true,
            ComponentSelection::Single(id) => id == component_id,
        }
    }
}

pub struct DocumentNode {
    engine: Arc<dyn NativeEngine>,
    pages: Vec<PageNode>,
}

impl fmt::Debug for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentNode").field("pages", &self.pages).finish_non_exhaustive()
    }
}

impl DocumentNode {
    /// Build the tree for `file`, creating one engine component per
    /// selected component.
    ///
    /// Manifest entries without content are skipped. Pages sharing an id are
    /// merged into the first of them. Components no page lists go to an
    /// implicit page (see [`PageNode::is_implicit`]).
    pub fn load(
        engine: Arc<dyn NativeEngine>,
        file: &OctopusFile,
        selection: &ComponentSelection,
    ) -> Result<Self, EditorError> {
        let manifest = &file.manifest;
        if let ComponentSelection::Single(id) = selection {
            if !manifest.contains_component(id) {
                return Err(EditorError::ComponentNotFound(id.clone()));
            }
        }

        // built in place so that an error part way through still destroys
        // what was created
        let mut document = DocumentNode {
            engine,
            pages: Vec::new(),
        };
        let mut loaded = HashSet::new();

        for page in manifest.pages() {
            let position = match document.pages.iter().position(|existing| existing.id() == page.id) {
                Some(position) => {
                    debug!(page_id = %page.id, "Merging page with duplicate id");
                    position
                }
                None => {
                    document.pages.push(PageNode::new(&page.id, &page.name));
                    document.pages.len() - 1
                }
            };
            for component in manifest.page_components(page) {
                if selection.includes(&component.id) && loaded.insert(component.id.clone()) {
                    document.instantiate(file, component, position)?;
                }
            }
        }

        let orphans: Vec<_> = manifest
            .orphaned_components()
            .into_iter()
            .filter(|component| selection.includes(&component.id) && !loaded.contains(&component.id))
            .collect();
        if !orphans.is_empty() {
            let id = document.unused_page_id(OTHER_PAGE_ID);
            document.pages.push(PageNode::implicit(id, OTHER_PAGE_NAME));
            let position = document.pages.len() - 1;
            for component in orphans {
                loaded.insert(component.id.clone());
                document.instantiate(file, component, position)?;
            }
        }

        if let ComponentSelection::Single(id) = selection {
            document.pages.retain(|page| !page.components().is_empty());
            if document.component(id).is_none() {
                return Err(EditorError::ComponentNotFound(id.clone()));
            }
        }

        info!(
            pages = document.pages.len(),
            components = document.components().count(),
            "Loaded document"
        );
        Ok(document)
    }

    /// One page holding one blank component whose root is an empty group
    pub fn empty(engine: Arc<dyn NativeEngine>) -> Result<Self, EditorError> {
        let content = OctopusComponent::new("component-1", OctopusLayer::new("root", LayerType::Group).with_name("Root"));
        let handle = create_component(engine.as_ref(), &content)?;

        let mut page = PageNode::new("page-1", "Page 1");
        page.push(ComponentNode::new(&content, "Component 1", None, handle));
        Ok(DocumentNode {
            engine,
            pages: vec![page],
        })
    }

    fn unused_page_id(&self, preferred: &str) -> String {
        let mut id = preferred.to_string();
        let mut suffix = 1;
        while self.page(&id).is_some() {
            suffix += 1;
            id = format!("{preferred}-{suffix}");
        }
        id
    }

    /// Create the engine side of `component` and add it to page `position`
    fn instantiate(
        &mut self,
        file: &OctopusFile,
        component: &ManifestComponent,
        position: usize,
    ) -> Result<(), EditorError> {
        let Some(content) = file.component(&component.id) else {
            debug!(component_id = %component.id, "Skipping component without content");
            return Ok(());
        };
        let handle = create_component(self.engine.as_ref(), content)?;
        let node = ComponentNode::new(content, &component.name, component.role.clone(), handle);
        match self.pages.get_mut(position) {
            Some(page) => page.push(node),
            None => self.engine.destroy_component(handle),
        }
        Ok(())
    }

    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    pub fn pages(&self) -> &[PageNode] {
        &self.pages
    }

    pub fn page(&self, id: &str) -> Option<&PageNode> {
        self.pages.iter().find(|page| page.id() == id)
    }

    /// Every component, page by page
    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> {
        self.pages.iter().flat_map(|page| page.components())
    }

    pub fn component(&self, id: &str) -> Option<&ComponentNode> {
        self.components().find(|component| component.id() == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut ComponentNode> {
        self.pages.iter_mut().find_map(|page| page.component_mut(id))
    }

    /// Page that owns the component `id`
    pub fn page_of(&self, id: &str) -> Option<&PageNode> {
        self.pages.iter().find(|page| page.component(id).is_some())
    }

    /// Mutable view of one layer
    pub fn layer_mut(&mut self, component_id: &str, layer_id: &str) -> Result<LayerCursor<'_>, EditorError> {
        let engine = self.engine.as_ref();
        let component = self
            .pages
            .iter_mut()
            .find_map(|page| page.component_mut(component_id))
            .ok_or_else(|| EditorError::ComponentNotFound(component_id.to_string()))?;
        if !component.contains_layer(layer_id) {
            return Err(EditorError::LayerNotFound(layer_id.to_string()));
        }
        Ok(LayerCursor::new(engine, component, layer_id))
    }

    /// Drop a component from the tree and destroy its engine counterpart
    pub fn remove_component(&mut self, id: &str) -> Result<(), EditorError> {
        let component = self
            .pages
            .iter_mut()
            .find_map(|page| page.take(id))
            .ok_or_else(|| EditorError::ComponentNotFound(id.to_string()))?;
        self.engine.destroy_component(component.handle());
        debug!(component_id = id, "Removed component");
        Ok(())
    }

    /// Fresh manifest snapshot of the current tree.
    ///
    /// The implicit page is not a real page; its components are listed as
    /// orphans again.
    pub fn manifest(&self) -> Manifest {
        let pages = self
            .pages
            .iter()
            .filter(|page| !page.is_implicit())
            .map(|page| ManifestPage {
                id: page.id().to_string(),
                name: page.name().to_string(),
                children: page
                    .components()
                    .iter()
                    .map(|component| ChildRef::new(component.id()))
                    .collect(),
            })
            .collect();
        let components = self
            .components()
            .map(|component| ManifestComponent {
                id: component.id().to_string(),
                name: component.name().to_string(),
                role: component.role().map(str::to_string),
            })
            .collect();
        Manifest::new(pages, components)
    }

    pub fn node(&self) -> Node<'_> {
        Node::Document(self)
    }
}

impl BaseNode for DocumentNode {
    fn id(&self) -> &str {
        DOCUMENT_ID
    }

    fn node_type(&self) -> NodeType {
        NodeType::Document
    }
}

impl Drop for DocumentNode {
    fn drop(&mut self) {
        let mut destroyed = 0;
        for page in &mut self.pages {
            for component in page.drain() {
                self.engine.destroy_component(component.handle());
                destroyed += 1;
            }
        }
        debug!(destroyed, "Document torn down");
    }
}
