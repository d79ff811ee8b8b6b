use opendesign_clipboard::ImportedClipboardPayload;
use opendesign_engine::NativeEngine;
use opendesign_import::{DroppedDesign, OctopusFile};
use std::sync::Arc;
use tracing::info;

use crate::nodes::{BaseNode, ComponentNode, ComponentSelection, DocumentNode, PageNode};
use crate::{EditorError, ImageLoader, PasteOutcome};

/// A document plus the state a host keeps around it: which component is
/// being edited and how images get into the engine.
pub struct Editor {
    document: DocumentNode,
    images: Box<dyn ImageLoader>,
    current_component: Option<String>,
}

impl Editor {
    /// Wrap `document`, starting on its first component
    pub fn new(document: DocumentNode, images: Box<dyn ImageLoader>) -> Self {
        let current_component = document.components().next().map(|c| c.id().to_string());
        Self {
            document,
            images,
            current_component,
        }
    }

    pub fn open(
        engine: Arc<dyn NativeEngine>,
        file: &OctopusFile,
        selection: &ComponentSelection,
        images: Box<dyn ImageLoader>,
    ) -> Result<Self, EditorError> {
        let document = DocumentNode::load(engine, file, selection)?;
        Ok(Self::new(document, images))
    }

    /// Open the component a user picked from a dropped file
    pub fn open_dropped(
        engine: Arc<dyn NativeEngine>,
        dropped: &DroppedDesign,
        component_id: &str,
        images: Box<dyn ImageLoader>,
    ) -> Result<Self, EditorError> {
        let picked = dropped.select(component_id)?;
        info!(component_id, name = %picked.name, "Opening dropped design");
        let file = dropped.file()?;
        Self::open(
            engine,
            &file,
            &ComponentSelection::Single(component_id.to_string()),
            images,
        )
    }

    /// Start from a blank document
    pub fn empty(engine: Arc<dyn NativeEngine>, images: Box<dyn ImageLoader>) -> Result<Self, EditorError> {
        Ok(Self::new(DocumentNode::empty(engine)?, images))
    }

    pub fn document(&self) -> &DocumentNode {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut DocumentNode {
        &mut self.document
    }

    pub fn current_component(&self) -> Option<&ComponentNode> {
        self.current_component
            .as_deref()
            .and_then(|id| self.document.component(id))
    }

    pub fn current_page(&self) -> Option<&PageNode> {
        self.current_component
            .as_deref()
            .and_then(|id| self.document.page_of(id))
    }

    pub fn select_component(&mut self, id: &str) -> Result<(), EditorError> {
        if self.document.component(id).is_none() {
            return Err(EditorError::ComponentNotFound(id.to_string()));
        }
        self.current_component = Some(id.to_string());
        Ok(())
    }

    /// Paste into the root layer of the current component
    pub async fn paste(&mut self, payload: &ImportedClipboardPayload) -> Result<PasteOutcome, EditorError> {
        let id = self
            .current_component
            .clone()
            .ok_or_else(|| EditorError::ComponentNotFound("<none selected>".to_string()))?;
        let engine = Arc::clone(self.document.engine());
        let component = self
            .document
            .component_mut(&id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))?;
        let root_id = component.root().id().to_string();

        component
            .paste(engine.as_ref(), self.images.as_ref(), &root_id, payload)
            .await
    }
}
