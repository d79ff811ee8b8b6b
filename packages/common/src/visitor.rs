use crate::octopus::OctopusLayer;
use serde_json::Value;

/// Visitor pattern for traversing octopus layer trees immutably
///
/// The default implementations walk the entire tree. Override specific
/// visit_* methods to perform custom actions on layers.
pub trait Visitor: Sized {
    fn visit_layer(&mut self, layer: &OctopusLayer) {
        walk_layer(self, layer);
    }

    fn visit_property(&mut self, _key: &str, _value: &Value) {
        // Leaf, properties are not walked further by default
    }
}

pub fn walk_layer<V: Visitor>(visitor: &mut V, layer: &OctopusLayer) {
    for (key, value) in &layer.properties {
        visitor.visit_property(key, value);
    }
    for child in layer.children() {
        visitor.visit_layer(child);
    }
}

/// Reference to a bitmap used by a layer fill or effect
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    /// Id of the layer that uses the image
    pub layer_id: String,
    /// `ref.value` of the image, a path or resource key
    pub path: String,
}

/// Collects every `{ "image": { "ref": { "value": ... } } }` reference in a
/// layer subtree, in document order and without duplicates.
#[derive(Debug, Default)]
pub struct ImageRefCollector {
    current_layer: String,
    refs: Vec<ImageRef>,
}

impl ImageRefCollector {
    pub fn collect(layer: &OctopusLayer) -> Vec<ImageRef> {
        let mut collector = Self::default();
        collector.visit_layer(layer);
        collector.refs
    }

    fn scan(&mut self, value: &Value) {
        match value {
            Value::Object(map) => {
                if let Some(path) = map
                    .get("image")
                    .and_then(|image| image.get("ref"))
                    .and_then(|r| r.get("value"))
                    .and_then(Value::as_str)
                {
                    if !self.refs.iter().any(|r| r.path == path) {
                        self.refs.push(ImageRef {
                            layer_id: self.current_layer.clone(),
                            path: path.to_string(),
                        });
                    }
                }
                for nested in map.values() {
                    self.scan(nested);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.scan(item);
                }
            }
            _ => {}
        }
    }
}

impl Visitor for ImageRefCollector {
    fn visit_layer(&mut self, layer: &OctopusLayer) {
        let parent = std::mem::replace(&mut self.current_layer, layer.id.clone());
        walk_layer(self, layer);
        self.current_layer = parent;
    }

    fn visit_property(&mut self, _key: &str, value: &Value) {
        self.scan(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_image_refs_from_nested_layers() {
        let layer = OctopusLayer::from_value(json!({
            "id": "group",
            "type": "GROUP",
            "layers": [
                {
                    "id": "pic",
                    "type": "SHAPE",
                    "shape": {
                        "fills": [
                            { "type": "IMAGE", "image": { "ref": { "type": "PATH", "value": "images/a.png" } } }
                        ]
                    }
                },
                {
                    "id": "again",
                    "type": "SHAPE",
                    "shape": {
                        "fills": [
                            { "type": "IMAGE", "image": { "ref": { "type": "PATH", "value": "images/a.png" } } },
                            { "type": "IMAGE", "image": { "ref": { "type": "PATH", "value": "images/b.png" } } }
                        ]
                    }
                }
            ]
        }))
        .unwrap();

        let refs = ImageRefCollector::collect(&layer);
        assert_eq!(
            refs,
            vec![
                ImageRef { layer_id: "pic".into(), path: "images/a.png".into() },
                ImageRef { layer_id: "again".into(), path: "images/b.png".into() },
            ]
        );
    }

    #[test]
    fn test_layer_without_images() {
        let layer = OctopusLayer::from_value(json!({ "id": "t", "type": "TEXT", "text": { "value": "hi" } })).unwrap();
        assert!(ImageRefCollector::collect(&layer).is_empty());
    }
}
