//! # Octopus
//!
//! Minimal typed view over the octopus interchange JSON.
//!
//! Only the fields the document model needs are typed (`id`, `type`, `name`,
//! child `layers` and `mask`). Everything else is kept verbatim in
//! `properties` so a layer handed to the engine serializes back to the exact
//! payload it was parsed from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::CommonResult;

/// Kind of an octopus layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerType {
    Shape,
    Text,
    ComponentReference,
    Group,
    MaskGroup,
}

impl LayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Shape => "SHAPE",
            LayerType::Text => "TEXT",
            LayerType::ComponentReference => "COMPONENT_REFERENCE",
            LayerType::Group => "GROUP",
            LayerType::MaskGroup => "MASK_GROUP",
        }
    }

    /// Whether layers of this kind may own child layers
    pub fn is_container(&self) -> bool {
        matches!(self, LayerType::Group | LayerType::MaskGroup)
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single octopus layer and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctopusLayer {
    pub id: String,

    #[serde(rename = "type")]
    pub layer_type: LayerType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Child layers (groups and mask groups)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<OctopusLayer>,

    /// Mask layer (mask groups only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Box<OctopusLayer>>,

    /// Untyped remainder of the layer (fills, text, transforms, ...)
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl OctopusLayer {
    /// Create a bare layer with no properties
    pub fn new(id: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            layer_type,
            name: None,
            layers: Vec::new(),
            mask: None,
            properties: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_layer(mut self, layer: OctopusLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn from_json(source: &str) -> CommonResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_value(value: Value) -> CommonResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> CommonResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Direct children in paint order: the mask first, then `layers`
    pub fn children(&self) -> impl Iterator<Item = &OctopusLayer> {
        self.mask.as_deref().into_iter().chain(self.layers.iter())
    }

    /// Find a layer by id in this subtree (including self)
    pub fn find(&self, id: &str) -> Option<&OctopusLayer> {
        if self.id == id {
            return Some(self);
        }
        self.children().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut OctopusLayer> {
        if self.id == id {
            return Some(self);
        }
        if let Some(mask) = self.mask.as_deref_mut() {
            if let Some(found) = mask.find_mut(id) {
                return Some(found);
            }
        }
        self.layers.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Ids of every layer in this subtree, depth first
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        for child in self.children() {
            ids.extend(child.ids());
        }
        ids
    }
}

/// An octopus component: a root layer plus component-level properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctopusComponent {
    pub id: String,

    pub content: OctopusLayer,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl OctopusComponent {
    pub fn new(id: impl Into<String>, content: OctopusLayer) -> Self {
        Self {
            id: id.into(),
            content,
            properties: Map::new(),
        }
    }

    pub fn from_json(source: &str) -> CommonResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> CommonResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_unknown_properties() {
        let layer = OctopusLayer::from_value(json!({
            "id": "L1",
            "type": "SHAPE",
            "shape": { "path": { "type": "RECTANGLE" } },
            "opacity": 0.5
        }))
        .unwrap();

        assert_eq!(layer.id, "L1");
        assert_eq!(layer.layer_type, LayerType::Shape);
        assert_eq!(layer.properties["opacity"], json!(0.5));

        let back: Value = serde_json::from_str(&layer.to_json().unwrap()).unwrap();
        assert_eq!(back["shape"]["path"]["type"], "RECTANGLE");
        assert!(back.get("layers").is_none());
    }

    #[test]
    fn test_unknown_layer_type_is_rejected() {
        let result = OctopusLayer::from_value(json!({ "id": "x", "type": "BLOB" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_find_searches_mask_and_children() {
        let mut group = OctopusLayer::new("g", LayerType::MaskGroup)
            .with_layer(OctopusLayer::new("a", LayerType::Shape));
        group.mask = Some(Box::new(OctopusLayer::new("m", LayerType::Shape)));

        assert!(group.find("m").is_some());
        assert!(group.find("a").is_some());
        assert!(group.find("zzz").is_none());
        assert_eq!(group.ids(), vec!["g", "m", "a"]);
    }
}
