use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::{CommonError, CommonResult};

/// Source of image bytes referenced by octopus layers
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the raw (still encoded) bytes stored under `path`
    async fn fetch(&self, path: &str) -> CommonResult<Vec<u8>>;

    /// Check that the source can be read at all
    async fn ready(&self) -> CommonResult<()> {
        Ok(())
    }
}

/// Assets read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` under the root, refusing anything that climbs out of it
    fn resolve(&self, path: &str) -> CommonResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(CommonError::AssetNotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetSource for DirectoryAssetSource {
    async fn fetch(&self, path: &str) -> CommonResult<Vec<u8>> {
        let full_path = self.resolve(path)?;
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CommonError::AssetNotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ready(&self) -> CommonResult<()> {
        let metadata = tokio::fs::metadata(&self.root).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(format!("{} is not a directory", self.root.display()).into())
        }
    }
}

/// In-memory assets, for testing and for payloads that carry their own bytes
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetSource {
    pub assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_asset(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(path.into(), bytes);
    }
}

#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch(&self, path: &str) -> CommonResult<Vec<u8>> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| CommonError::AssetNotFound(path.to_string()))
    }
}
