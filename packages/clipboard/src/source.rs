use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Failed to read clipboard: {0}")]
    Read(String),
}

/// Raw content of one representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepresentationData {
    Text(String),
    Bytes(Vec<u8>),
}

/// One of the competing representations a platform offers for a paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    /// Declared type, e.g. `JSON`, `image/png`, `text/plain`
    pub type_tag: String,
    /// File name or resource key, when the platform provides one
    pub name: Option<String>,
    pub data: RepresentationData,
}

impl Representation {
    pub fn text(type_tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            name: None,
            data: RepresentationData::Text(text.into()),
        }
    }

    pub fn bytes(type_tag: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            type_tag: type_tag.into(),
            name: None,
            data: RepresentationData::Bytes(bytes),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Something that can be asked for clipboard representations
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    async fn read(&self) -> Result<Vec<Representation>, ClipboardError>;
}

/// Representations captured from a platform paste or drop event,
/// in platform-reported order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteEvent {
    representations: Vec<Representation>,
}

impl PasteEvent {
    pub fn new(representations: Vec<Representation>) -> Self {
        Self { representations }
    }

    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }
}

#[async_trait]
impl ClipboardSource for PasteEvent {
    async fn read(&self) -> Result<Vec<Representation>, ClipboardError> {
        Ok(self.representations.clone())
    }
}
