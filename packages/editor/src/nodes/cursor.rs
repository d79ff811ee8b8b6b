use opendesign_clipboard::ImportedClipboardPayload;
use opendesign_common::OctopusLayer;
use opendesign_engine::NativeEngine;

use super::{BaseNode, ComponentNode, InsertPosition, LayerContainer, LayerNode};
use crate::{EditorError, ImageLoader, PasteOutcome};

/// Mutable handle on one layer, obtained from [`DocumentNode::layer_mut`].
///
/// [`DocumentNode::layer_mut`]: super::DocumentNode::layer_mut
pub struct LayerCursor<'a> {
    engine: &'a dyn NativeEngine,
    component: &'a mut ComponentNode,
    layer_id: String,
}

impl<'a> LayerCursor<'a> {
    pub(crate) fn new(engine: &'a dyn NativeEngine, component: &'a mut ComponentNode, layer_id: &str) -> Self {
        Self {
            engine,
            component,
            layer_id: layer_id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.layer_id
    }

    pub fn component_id(&self) -> &str {
        self.component.id()
    }

    pub fn layer(&self) -> Option<&LayerNode> {
        self.component.find_layer(&self.layer_id)
    }

    /// Append `octopus` as the last child of this layer
    pub fn create_layer(&mut self, octopus: &OctopusLayer) -> Result<&LayerNode, EditorError> {
        self.component
            .create_layer(self.engine, &self.layer_id, InsertPosition::Append, octopus)
    }

    /// Insert `octopus` under this layer, before the child `before_id`
    pub fn create_layer_before(&mut self, before_id: &str, octopus: &OctopusLayer) -> Result<&LayerNode, EditorError> {
        self.component.create_layer(
            self.engine,
            &self.layer_id,
            InsertPosition::Before(before_id.to_string()),
            octopus,
        )
    }

    /// Merge a clipboard payload under this layer
    pub async fn paste(
        &mut self,
        payload: &ImportedClipboardPayload,
        images: &dyn ImageLoader,
    ) -> Result<PasteOutcome, EditorError> {
        self.component.paste(self.engine, images, &self.layer_id, payload).await
    }

    /// Remove this layer and its subtree
    pub fn remove(self) -> Result<LayerNode, EditorError> {
        self.component.remove_layer(self.engine, &self.layer_id)
    }
}
