use opendesign_common::OctopusLayer;
use tracing::debug;

use crate::{
    ClipboardError, ClipboardPart, ClipboardSource, ImagePart, ImportedClipboardPayload, JsonPart, PartKind,
    PasteEvent, Representation, RepresentationData,
};

/// Type tags that carry octopus layer JSON
const JSON_TAGS: &[&str] = &["JSON", "application/json", "application/vnd.octopus+json"];

/// Classify a declared representation type; `None` means unusable
pub fn classify(type_tag: &str) -> Option<PartKind> {
    let tag = type_tag.trim();
    if JSON_TAGS.iter().any(|known| tag.eq_ignore_ascii_case(known)) {
        Some(PartKind::Json)
    } else if tag.len() > "image/".len() && tag.get(..6).is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/")) {
        Some(PartKind::Image)
    } else if tag.eq_ignore_ascii_case("text/plain") || tag.eq_ignore_ascii_case("text") {
        Some(PartKind::Text)
    } else {
        None
    }
}

fn json_part(data: RepresentationData) -> JsonPart {
    let source = match data {
        RepresentationData::Text(text) => text,
        RepresentationData::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                return JsonPart {
                    content: None,
                    source: String::new(),
                    error: Some(e.to_string()),
                }
            }
        },
    };

    match OctopusLayer::from_json(&source) {
        Ok(layer) => JsonPart {
            content: Some(layer),
            source,
            error: None,
        },
        Err(e) => JsonPart {
            content: None,
            source,
            error: Some(e.to_string()),
        },
    }
}

fn image_part(representation: Representation, ordinal: usize) -> Option<ImagePart> {
    let bytes = match representation.data {
        RepresentationData::Bytes(bytes) => bytes,
        RepresentationData::Text(_) => {
            debug!(type_tag = %representation.type_tag, "Skipping image representation without binary data");
            return None;
        }
    };
    let mime = representation.type_tag.trim().to_ascii_lowercase();
    let name = representation.name.unwrap_or_else(|| {
        let extension = mime.split('/').nth(1).unwrap_or("bin");
        format!("clipboard-image-{ordinal}.{extension}")
    });
    Some(ImagePart { name, mime, bytes })
}

fn text_part(data: RepresentationData) -> Option<String> {
    match data {
        RepresentationData::Text(text) => Some(text),
        RepresentationData::Bytes(bytes) => String::from_utf8(bytes).ok(),
    }
}

/// Normalize representations into a payload.
///
/// The first design-JSON representation wins; later ones are dropped.
/// Returns `None` when nothing usable was offered.
pub fn import_from_representations(representations: Vec<Representation>) -> Option<ImportedClipboardPayload> {
    let mut parts = Vec::new();
    let mut has_json = false;
    let mut images = 0;

    for representation in representations {
        match classify(&representation.type_tag) {
            Some(PartKind::Json) if has_json => {
                debug!(type_tag = %representation.type_tag, "Dropping additional design representation");
            }
            Some(PartKind::Json) => {
                has_json = true;
                parts.push(ClipboardPart::Json(json_part(representation.data)));
            }
            Some(PartKind::Image) => {
                if let Some(image) = image_part(representation, images) {
                    images += 1;
                    parts.push(ClipboardPart::Image(image));
                }
            }
            Some(PartKind::Text) => {
                if let Some(text) = text_part(representation.data) {
                    parts.push(ClipboardPart::Text(text));
                }
            }
            None => {
                debug!(type_tag = %representation.type_tag, "Skipping unsupported representation");
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        debug!(parts = parts.len(), has_json, "Imported clipboard payload");
        Some(ImportedClipboardPayload::new(parts))
    }
}

/// Read a paste payload from `event`, or from `fallback` when the paste was
/// triggered without an event (e.g. a "paste" button).
pub async fn import_from_clipboard(
    event: Option<&PasteEvent>,
    fallback: &dyn ClipboardSource,
) -> Result<Option<ImportedClipboardPayload>, ClipboardError> {
    let representations = match event {
        Some(event) => event.representations().to_vec(),
        None => fallback.read().await?,
    };
    Ok(import_from_representations(representations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("JSON"), Some(PartKind::Json));
        assert_eq!(classify("application/json"), Some(PartKind::Json));
        assert_eq!(classify("image/png"), Some(PartKind::Image));
        assert_eq!(classify("IMAGE/JPEG"), Some(PartKind::Image));
        assert_eq!(classify("text/plain"), Some(PartKind::Text));
        assert_eq!(classify("text"), Some(PartKind::Text));
        assert_eq!(classify("text/html"), None);
        assert_eq!(classify("image/"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_unnamed_images_get_generated_names() {
        let payload = import_from_representations(vec![
            Representation::bytes("image/png", vec![1]),
            Representation::bytes("image/jpeg", vec![2]).with_name("photo.jpg"),
            Representation::bytes("image/gif", vec![3]),
        ])
        .unwrap();

        let names: Vec<&str> = payload.images().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["clipboard-image-0.png", "photo.jpg", "clipboard-image-2.gif"]);
    }
}
