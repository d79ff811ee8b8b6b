//! Canonical interchange container
//!
//! ```json
//! {
//!   "octopusFile": "3.0",
//!   "manifest": { "pages": [...], "components": [...] },
//!   "components": { "<id>": { "id": "<id>", "content": { ...layer... } } }
//! }
//! ```

use opendesign_common::OctopusComponent;
use opendesign_manifest::Manifest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ImportError;

pub const OCTOPUS_FILE_VERSION: &str = "3.0";

/// A design in the canonical encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OctopusFile {
    pub octopus_file: String,
    pub manifest: Manifest,
    #[serde(default)]
    pub components: BTreeMap<String, OctopusComponent>,
}

impl OctopusFile {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            octopus_file: OCTOPUS_FILE_VERSION.to_string(),
            manifest,
            components: BTreeMap::new(),
        }
    }

    pub fn with_component(mut self, component: OctopusComponent) -> Self {
        self.components.insert(component.id.clone(), component);
        self
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ImportError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ImportError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn component(&self, id: &str) -> Option<&OctopusComponent> {
        self.components.get(id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    #[allow(dead_code)]
    octopus_file: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestOnly {
    #[allow(dead_code)]
    octopus_file: String,
    manifest: Manifest,
}

/// Whether `bytes` are already in the canonical encoding
pub fn is_optimized_octopus_file(bytes: &[u8]) -> bool {
    let starts_as_object = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{');

    starts_as_object && serde_json::from_slice::<Header>(bytes).is_ok()
}

/// Read only the manifest of a canonical file
pub fn read_manifest(bytes: &[u8]) -> Result<Manifest, ImportError> {
    let file: ManifestOnly = serde_json::from_slice(bytes)?;
    Ok(file.manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendesign_common::{LayerType, OctopusLayer};
    use opendesign_manifest::{ManifestComponent, ManifestPage};

    fn sample() -> OctopusFile {
        OctopusFile::new(Manifest::new(
            vec![ManifestPage::new("Page1Id", "Page 1", &["c1"])],
            vec![ManifestComponent::new("c1", "Home")],
        ))
        .with_component(OctopusComponent::new("c1", OctopusLayer::new("root", LayerType::Group)))
    }

    #[test]
    fn test_detects_canonical_bytes() {
        let bytes = sample().to_bytes().unwrap();
        assert!(is_optimized_octopus_file(&bytes));
        assert!(!is_optimized_octopus_file(b"{\"manifest\":{}}"));
        assert!(!is_optimized_octopus_file(b"fig-kiwi"));
        assert!(!is_optimized_octopus_file(b""));
    }

    #[test]
    fn test_read_manifest() {
        let bytes = sample().to_bytes().unwrap();
        let manifest = read_manifest(&bytes).unwrap();

        assert_eq!(manifest.pages()[0].name, "Page 1");
        let components = manifest.components_for_page("Page1Id");
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "Home");
    }

    #[test]
    fn test_parse_keeps_components() {
        let bytes = sample().to_bytes().unwrap();
        let file = OctopusFile::parse(&bytes).unwrap();
        assert_eq!(file, sample());
        assert_eq!(file.component("c1").unwrap().content.id, "root");
    }
}
