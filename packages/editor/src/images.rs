//! # Image Loading
//!
//! Gets the bitmaps a pasted layer needs into the engine. Images carried by
//! the paste itself are registered first; every other reference found in the
//! design part is fetched from an [`AssetSource`].
//!
//! Scopes are opened per engine call and never held across a fetch.

use async_trait::async_trait;
use opendesign_clipboard::ImportedClipboardPayload;
use opendesign_common::{AssetSource, ImageRefCollector};
use opendesign_engine::{with_scope, NativeEngine};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Non-fatal failure to load one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoadWarning {
    /// Image key or path
    pub image: String,
    pub reason: String,
}

impl fmt::Display for ImageLoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image '{}' not loaded: {}", self.image, self.reason)
    }
}

/// Failure that prevented image loading as a whole
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("Asset source unavailable: {0}")]
    SourceUnavailable(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageLoadReport {
    /// Keys registered with the engine, in load order
    pub loaded: Vec<String>,
    pub warnings: Vec<ImageLoadWarning>,
}

impl ImageLoadReport {
    fn warn(&mut self, image: &str, reason: impl Into<String>) {
        let warning = ImageLoadWarning {
            image: image.to_string(),
            reason: reason.into(),
        };
        warn!(image = %warning.image, reason = %warning.reason, "Image failed to load");
        self.warnings.push(warning);
    }
}

#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load_images(
        &self,
        engine: &dyn NativeEngine,
        payload: &ImportedClipboardPayload,
    ) -> Result<ImageLoadReport, ImageLoadError>;
}

/// Hand `bytes` to the engine under `key`
fn register(engine: &dyn NativeEngine, key: &str, bytes: &[u8]) -> Result<(), String> {
    with_scope(engine, |scope| {
        let error = scope.error_slot();
        if engine.load_image(scope.string(key), bytes, error) {
            Ok(())
        } else {
            Err(scope
                .error_message(error)
                .unwrap_or_else(|| "engine rejected image".to_string()))
        }
    })
}

/// Loads payload images and fetches the rest from `S`
#[derive(Debug, Clone)]
pub struct EngineImageLoader<S: AssetSource> {
    assets: S,
}

impl<S: AssetSource> EngineImageLoader<S> {
    pub fn new(assets: S) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &S {
        &self.assets
    }
}

#[async_trait]
impl<S: AssetSource> ImageLoader for EngineImageLoader<S> {
    async fn load_images(
        &self,
        engine: &dyn NativeEngine,
        payload: &ImportedClipboardPayload,
    ) -> Result<ImageLoadReport, ImageLoadError> {
        let mut report = ImageLoadReport::default();
        let mut attempted = HashSet::new();

        for image in payload.images() {
            attempted.insert(image.name.clone());
            match register(engine, &image.name, &image.bytes) {
                Ok(()) => report.loaded.push(image.name.clone()),
                Err(reason) => report.warn(&image.name, reason),
            }
        }

        let refs = payload.octopus().map(ImageRefCollector::collect).unwrap_or_default();
        let missing: Vec<_> = refs.into_iter().filter(|r| !attempted.contains(&r.path)).collect();
        if missing.is_empty() {
            return Ok(report);
        }

        self.assets
            .ready()
            .await
            .map_err(|e| ImageLoadError::SourceUnavailable(e.to_string()))?;

        for image_ref in missing {
            debug!(path = %image_ref.path, layer_id = %image_ref.layer_id, "Fetching image");
            let bytes = match self.assets.fetch(&image_ref.path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    report.warn(&image_ref.path, e.to_string());
                    continue;
                }
            };
            match register(engine, &image_ref.path, &bytes) {
                Ok(()) => report.loaded.push(image_ref.path),
                Err(reason) => report.warn(&image_ref.path, reason),
            }
        }

        Ok(report)
    }
}
