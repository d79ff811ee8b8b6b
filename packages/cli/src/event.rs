//! Paste-event fixture files
//!
//! ```json
//! {
//!   "representations": [
//!     { "type": "text/plain", "text": "Rectangle" },
//!     { "type": "JSON", "json": { "id": "L1", "type": "SHAPE" } },
//!     { "type": "image/png", "name": "images/a.png", "base64": "iVBORw0..." }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use opendesign_clipboard::{PasteEvent, Representation};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct EventFile {
    pub representations: Vec<RepresentationEntry>,
}

/// One representation; exactly one of `text`, `json` or `base64` is set
#[derive(Debug, Deserialize)]
pub struct RepresentationEntry {
    #[serde(rename = "type")]
    pub type_tag: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub json: Option<serde_json::Value>,

    #[serde(default)]
    pub base64: Option<String>,
}

impl RepresentationEntry {
    fn into_representation(self, position: usize) -> Result<Representation> {
        let representation = match (self.text, self.json, self.base64) {
            (Some(text), None, None) => Representation::text(&self.type_tag, text),
            (None, Some(json), None) => Representation::text(&self.type_tag, json.to_string()),
            (None, None, Some(encoded)) => {
                let bytes = STANDARD
                    .decode(encoded.trim())
                    .with_context(|| format!("representation {position} ({}) has invalid base64", self.type_tag))?;
                Representation::bytes(&self.type_tag, bytes)
            }
            _ => bail!(
                "representation {position} ({}) must carry exactly one of text, json or base64",
                self.type_tag
            ),
        };

        Ok(match self.name {
            Some(name) => representation.with_name(name),
            None => representation,
        })
    }
}

impl EventFile {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn into_event(self) -> Result<PasteEvent> {
        let representations = self
            .representations
            .into_iter()
            .enumerate()
            .map(|(position, entry)| entry.into_representation(position))
            .collect::<Result<Vec<_>>>()?;
        Ok(PasteEvent::new(representations))
    }
}

/// Read a fixture file into a paste event
pub async fn load_event(path: &Path) -> Result<PasteEvent> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    EventFile::parse(&source)?.into_event()
}
