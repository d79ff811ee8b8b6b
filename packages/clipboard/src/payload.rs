use opendesign_common::OctopusLayer;
use std::fmt;

/// Classification of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Json,
    Image,
    Text,
}

/// Structured-design part
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPart {
    /// Parsed layer, `None` when the source is not a valid octopus layer
    pub content: Option<OctopusLayer>,
    /// Text exactly as received
    pub source: String,
    /// Why `content` could not be parsed
    pub error: Option<String>,
}

/// Encoded image carried by the paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    /// Key octopus image refs use to find this image
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardPart {
    Json(JsonPart),
    Image(ImagePart),
    Text(String),
}

impl ClipboardPart {
    pub fn kind(&self) -> PartKind {
        match self {
            ClipboardPart::Json(_) => PartKind::Json,
            ClipboardPart::Image(_) => PartKind::Image,
            ClipboardPart::Text(_) => PartKind::Text,
        }
    }
}

impl fmt::Display for ClipboardPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardPart::Json(part) => match (&part.content, &part.error) {
                (Some(layer), _) => write!(f, "JSON layer {} ({})", layer.id, layer.layer_type),
                (None, Some(error)) => write!(f, "JSON (malformed: {error})"),
                (None, None) => write!(f, "JSON (malformed)"),
            },
            ClipboardPart::Image(image) => {
                write!(f, "image {} ({}, {} bytes)", image.name, image.mime, image.bytes.len())
            }
            ClipboardPart::Text(text) => write!(f, "text ({} chars)", text.chars().count()),
        }
    }
}

/// Typed parts extracted from one paste event.
///
/// Holds at most one [`JsonPart`]; any number of images and texts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportedClipboardPayload {
    parts: Vec<ClipboardPart>,
}

impl ImportedClipboardPayload {
    pub(crate) fn new(parts: Vec<ClipboardPart>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[ClipboardPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn json_part(&self) -> Option<&JsonPart> {
        self.parts.iter().find_map(|part| match part {
            ClipboardPart::Json(json) => Some(json),
            _ => None,
        })
    }

    /// Parsed design layer, if the payload carries a well-formed one
    pub fn octopus(&self) -> Option<&OctopusLayer> {
        self.json_part().and_then(|json| json.content.as_ref())
    }

    pub fn images(&self) -> impl Iterator<Item = &ImagePart> {
        self.parts.iter().filter_map(|part| match part {
            ClipboardPart::Image(image) => Some(image),
            _ => None,
        })
    }

    pub fn image(&self, name: &str) -> Option<&ImagePart> {
        self.images().find(|image| image.name == name)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            ClipboardPart::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }
}
