//! File-drop flow: convert, read manifest, select a component

use async_trait::async_trait;
use opendesign_common::{LayerType, OctopusComponent, OctopusLayer};
use opendesign_import::{
    import_dropped_file, ConversionError, DesignFormat, FormatConverter, ImportError, NoConverter, OctopusFile,
};
use opendesign_manifest::{Manifest, ManifestComponent, ManifestPage};
use std::sync::atomic::{AtomicUsize, Ordering};

fn design() -> OctopusFile {
    OctopusFile::new(Manifest::new(
        vec![ManifestPage::new("Page1Id", "Page 1", &["c1", "ghost"])],
        vec![ManifestComponent::new("c1", "Home"), ManifestComponent::new("c2", "Loose")],
    ))
    .with_component(OctopusComponent::new("c1", OctopusLayer::new("c1-root", LayerType::Group)))
    .with_component(OctopusComponent::new("c2", OctopusLayer::new("c2-root", LayerType::Group)))
}

/// Pretends to convert Sketch files and counts invocations
struct CountingConverter {
    output: Vec<u8>,
    calls: AtomicUsize,
}

#[async_trait]
impl FormatConverter for CountingConverter {
    async fn convert(&self, _bytes: &[u8], format: DesignFormat) -> Result<Vec<u8>, ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match format {
            DesignFormat::Sketch => Ok(self.output.clone()),
            other => Err(ConversionError::Unsupported { format: other }),
        }
    }
}

#[tokio::test]
async fn test_canonical_drop_skips_conversion() {
    let converter = CountingConverter {
        output: Vec::new(),
        calls: AtomicUsize::new(0),
    };
    let bytes = design().to_bytes().unwrap();

    let dropped = import_dropped_file(bytes.clone(), &converter).await.unwrap();

    assert_eq!(dropped.bytes(), bytes.as_slice());
    assert_eq!(converter.calls.load(Ordering::SeqCst), 0);
    assert_eq!(dropped.manifest().pages()[0].name, "Page 1");
}

#[tokio::test]
async fn test_legacy_drop_is_converted() {
    let converter = CountingConverter {
        output: design().to_bytes().unwrap(),
        calls: AtomicUsize::new(0),
    };
    let mut sketch = b"PK\x03\x04".to_vec();
    sketch.extend_from_slice(b"document.json");

    let dropped = import_dropped_file(sketch, &converter).await.unwrap();

    assert_eq!(converter.calls.load(Ordering::SeqCst), 1);
    assert_eq!(dropped.file().unwrap(), design());
}

#[tokio::test]
async fn test_unconvertible_drop_aborts() {
    let err = import_dropped_file(b"8BPS....".to_vec(), &NoConverter).await.unwrap_err();
    assert!(matches!(
        err,
        ImportError::Conversion(ConversionError::Unsupported { format: DesignFormat::Photoshop })
    ));
}

#[tokio::test]
async fn test_selection_requires_known_component() {
    let dropped = import_dropped_file(design().to_bytes().unwrap(), &NoConverter).await.unwrap();

    assert_eq!(dropped.select("c1").unwrap().name, "Home");
    assert_eq!(dropped.select("c2").unwrap().name, "Loose");
    // listed on a page but missing from the component table
    assert!(matches!(dropped.select("ghost"), Err(ImportError::UnknownComponent(id)) if id == "ghost"));
}
