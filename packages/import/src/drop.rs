use opendesign_manifest::{Manifest, ManifestComponent};
use tracing::info;

use crate::{convert_to_canonical, read_manifest, FormatConverter, ImportError, OctopusFile};

/// A dropped design, converted and indexed, waiting for a component choice
#[derive(Debug, Clone)]
pub struct DroppedDesign {
    bytes: Vec<u8>,
    manifest: Manifest,
}

impl DroppedDesign {
    /// Canonical bytes of the design
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Confirm that `component_id` can be opened from this design
    pub fn select(&self, component_id: &str) -> Result<&ManifestComponent, ImportError> {
        self.manifest
            .component(component_id)
            .ok_or_else(|| ImportError::UnknownComponent(component_id.to_string()))
    }

    /// Parse the full container (manifest and component bodies)
    pub fn file(&self) -> Result<OctopusFile, ImportError> {
        OctopusFile::parse(&self.bytes)
    }
}

/// Convert dropped file bytes and read their manifest for selection
pub async fn import_dropped_file(
    bytes: Vec<u8>,
    converter: &dyn FormatConverter,
) -> Result<DroppedDesign, ImportError> {
    let bytes = convert_to_canonical(bytes, converter).await?;
    let manifest = read_manifest(&bytes)?;

    info!(
        pages = manifest.pages().len(),
        components = manifest.components().len(),
        "Design ready for component selection"
    );
    Ok(DroppedDesign { bytes, manifest })
}
