use opendesign_clipboard::ImportedClipboardPayload;
use opendesign_common::{OctopusComponent, OctopusLayer};
use opendesign_engine::{with_scope, ComponentHandle, NativeEngine};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{BaseNode, LayerContainer, LayerNode, NodeType};
use crate::paste::{PasteFailure, PasteOutcome, PasteProgress, PasteState};
use crate::{EditorError, ImageLoader, ImageLoadWarning};

/// Where a new layer goes among its parent's children
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InsertPosition {
    #[default]
    Append,
    /// Directly before the sibling with this id
    Before(String),
}

impl InsertPosition {
    /// Id handed to the engine; empty means append
    fn before_id(&self) -> &str {
        match self {
            InsertPosition::Append => "",
            InsertPosition::Before(id) => id,
        }
    }
}

/// A component instantiated in the engine
#[derive(Debug)]
pub struct ComponentNode {
    id: String,
    name: String,
    role: Option<String>,
    handle: ComponentHandle,
    root: LayerNode,
    last_paste: Vec<PasteState>,
}

impl ComponentNode {
    pub(crate) fn new(
        component: &OctopusComponent,
        name: impl Into<String>,
        role: Option<String>,
        handle: ComponentHandle,
    ) -> Self {
        Self {
            id: component.id.clone(),
            name: name.into(),
            role,
            handle,
            root: LayerNode::from_octopus(&component.content, handle, None),
            last_paste: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    /// The component's content layer
    pub fn root(&self) -> &LayerNode {
        &self.root
    }

    /// States the most recent paste into this component went through,
    /// failed or not. Empty before the first paste.
    pub fn last_paste(&self) -> &[PasteState] {
        &self.last_paste
    }

    /// Insert `octopus` under `parent_id`.
    ///
    /// The tree is only touched after the engine accepted the layer, so a
    /// rejected insertion leaves both sides as they were.
    pub fn create_layer(
        &mut self,
        engine: &dyn NativeEngine,
        parent_id: &str,
        position: InsertPosition,
        octopus: &OctopusLayer,
    ) -> Result<&LayerNode, EditorError> {
        let index = self.insertion_index(parent_id, &position, octopus)?;
        self.insert_checked(engine, parent_id, &position, index, octopus)
    }

    /// Tree-side checks for an insertion; yields the child index for
    /// `Before` positions
    fn insertion_index(
        &self,
        parent_id: &str,
        position: &InsertPosition,
        octopus: &OctopusLayer,
    ) -> Result<Option<usize>, EditorError> {
        let parent = self
            .root
            .find(parent_id)
            .ok_or_else(|| EditorError::LayerNotFound(parent_id.to_string()))?;

        let mut incoming = HashSet::new();
        for id in octopus.ids() {
            if !incoming.insert(id) || self.root.find(id).is_some() {
                return Err(EditorError::DuplicateLayerId(id.to_string()));
            }
        }

        match position {
            InsertPosition::Append => Ok(None),
            InsertPosition::Before(before_id) => parent
                .children()
                .iter()
                .position(|child| child.id() == before_id)
                .map(Some)
                .ok_or_else(|| EditorError::LayerNotFound(before_id.clone())),
        }
    }

    /// Hand a checked layer to the engine, then mirror it in the tree
    fn insert_checked(
        &mut self,
        engine: &dyn NativeEngine,
        parent_id: &str,
        position: &InsertPosition,
        index: Option<usize>,
        octopus: &OctopusLayer,
    ) -> Result<&LayerNode, EditorError> {
        let json = serde_json::to_string(octopus)?;
        with_scope(engine, |scope| {
            let error = scope.error_slot();
            let inserted = engine.insert_layer(
                self.handle,
                scope.string(parent_id),
                scope.string(position.before_id()),
                scope.string(&json),
                error,
            );
            if inserted {
                Ok(())
            } else {
                Err(EditorError::EngineParse {
                    message: scope
                        .error_message(error)
                        .unwrap_or_else(|| "unknown engine error".to_string()),
                })
            }
        })?;

        engine.request_redraw();
        debug!(component_id = %self.id, parent_id, layer_id = %octopus.id, "Inserted layer");

        let node = LayerNode::from_octopus(octopus, self.handle, Some(parent_id));
        let parent = self
            .root
            .find_mut(parent_id)
            .ok_or_else(|| EditorError::LayerNotFound(parent_id.to_string()))?;
        let index = match index {
            Some(index) => {
                parent.insert_child(index, node);
                index
            }
            None => parent.push_child(node),
        };
        Ok(&parent.children()[index])
    }

    /// Remove a layer and its subtree from the engine and the tree
    pub fn remove_layer(&mut self, engine: &dyn NativeEngine, layer_id: &str) -> Result<LayerNode, EditorError> {
        if !self.contains_layer(layer_id) {
            return Err(EditorError::LayerNotFound(layer_id.to_string()));
        }

        with_scope(engine, |scope| {
            let error = scope.error_slot();
            if engine.remove_layer(self.handle, scope.string(layer_id), error) {
                Ok(())
            } else {
                Err(EditorError::LayerRemoval {
                    message: scope
                        .error_message(error)
                        .unwrap_or_else(|| "unknown engine error".to_string()),
                })
            }
        })?;

        engine.request_redraw();
        debug!(component_id = %self.id, layer_id, "Removed layer");

        self.root
            .detach(layer_id)
            .ok_or_else(|| EditorError::LayerNotFound(layer_id.to_string()))
    }

    /// Merge a clipboard payload under `parent_id`.
    ///
    /// Fails without touching the engine when the payload has no parsed
    /// design part. Image problems are reported as warnings and do not fail
    /// the paste.
    pub async fn paste(
        &mut self,
        engine: &dyn NativeEngine,
        images: &dyn ImageLoader,
        parent_id: &str,
        payload: &ImportedClipboardPayload,
    ) -> Result<PasteOutcome, EditorError> {
        let mut progress = PasteProgress::start();
        let result = self.run_paste(&mut progress, engine, images, parent_id, payload).await;
        self.last_paste = progress.history().to_vec();

        let (layer_id, warnings) = result?;
        info!(
            component_id = %self.id,
            layer_id = %layer_id,
            warnings = warnings.len(),
            "Paste complete"
        );
        Ok(progress.finish(layer_id, warnings))
    }

    async fn run_paste(
        &mut self,
        progress: &mut PasteProgress,
        engine: &dyn NativeEngine,
        images: &dyn ImageLoader,
        parent_id: &str,
        payload: &ImportedClipboardPayload,
    ) -> Result<(String, Vec<ImageLoadWarning>), EditorError> {
        let Some(octopus) = payload.octopus() else {
            progress.fail(PasteFailure::MissingOctopusPart);
            return Err(EditorError::MissingOctopusPart);
        };

        let index = match self.insertion_index(parent_id, &InsertPosition::Append, octopus) {
            Ok(index) => index,
            Err(e) => {
                progress.fail(PasteFailure::InvalidTarget);
                return Err(e);
            }
        };

        progress.advance(PasteState::LayerInserted);
        let layer_id = match self.insert_checked(engine, parent_id, &InsertPosition::Append, index, octopus) {
            Ok(layer) => layer.id().to_string(),
            Err(e) => {
                progress.fail(PasteFailure::EngineParse);
                return Err(e);
            }
        };

        progress.advance(PasteState::ImagesResolving);
        let warnings = match images.load_images(engine, payload).await {
            Ok(report) => report.warnings,
            Err(e) => {
                warn!(error = %e, "Image loading skipped");
                vec![ImageLoadWarning {
                    image: "*".to_string(),
                    reason: e.to_string(),
                }]
            }
        };
        engine.request_redraw();
        progress.advance(PasteState::Complete);
        Ok((layer_id, warnings))
    }
}

impl BaseNode for ComponentNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Component
    }
}

impl LayerContainer for ComponentNode {
    fn layers(&self) -> &[LayerNode] {
        std::slice::from_ref(&self.root)
    }
}
