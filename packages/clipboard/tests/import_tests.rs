//! Clipboard payload extraction

use async_trait::async_trait;
use opendesign_clipboard::{
    import_from_clipboard, import_from_representations, ClipboardError, ClipboardPart, ClipboardSource, PartKind,
    PasteEvent, Representation,
};
use opendesign_common::LayerType;
use serde_json::json;

fn layer_json(id: &str) -> String {
    json!({ "id": id, "type": "SHAPE", "shape": { "path": { "type": "RECTANGLE" } } }).to_string()
}

struct FailingClipboard;

#[async_trait]
impl ClipboardSource for FailingClipboard {
    async fn read(&self) -> Result<Vec<Representation>, ClipboardError> {
        Err(ClipboardError::Read("permission denied".into()))
    }
}

#[test]
fn test_json_part_selected_regardless_of_position() {
    let payload = import_from_representations(vec![
        Representation::text("text", "copied from somewhere"),
        Representation::text("JSON", layer_json("L1")),
    ])
    .unwrap();

    let layer = payload.octopus().expect("design part");
    assert_eq!(layer.id, "L1");
    assert_eq!(layer.layer_type, LayerType::Shape);
    assert_eq!(payload.texts().collect::<Vec<_>>(), vec!["copied from somewhere"]);
}

#[test]
fn test_first_json_representation_wins() {
    let payload = import_from_representations(vec![
        Representation::text("application/json", layer_json("first")),
        Representation::text("JSON", layer_json("second")),
    ])
    .unwrap();

    let json_parts = payload.parts().iter().filter(|p| p.kind() == PartKind::Json).count();
    assert_eq!(json_parts, 1);
    assert_eq!(payload.octopus().unwrap().id, "first");
}

#[test]
fn test_malformed_json_is_kept_without_content() {
    let payload = import_from_representations(vec![Representation::text("JSON", r#"{"id": 5}"#)]).unwrap();

    let part = payload.json_part().unwrap();
    assert!(part.content.is_none());
    assert!(part.error.is_some());
    assert_eq!(part.source, r#"{"id": 5}"#);
    assert!(payload.octopus().is_none());
    assert!(payload.parts()[0].to_string().starts_with("JSON (malformed"));
}

#[test]
fn test_nothing_usable_yields_none() {
    assert!(import_from_representations(vec![]).is_none());
    assert!(import_from_representations(vec![
        Representation::text("text/html", "<b>hi</b>"),
        Representation::text("image/png", "not bytes"),
    ])
    .is_none());
}

#[test]
fn test_images_and_text_are_collected() {
    let payload = import_from_representations(vec![
        Representation::bytes("image/png", vec![0x89, b'P', b'N', b'G']).with_name("images/a.png"),
        Representation::bytes("text/plain", b"hello".to_vec()),
    ])
    .unwrap();

    let image = payload.image("images/a.png").unwrap();
    assert_eq!(image.mime, "image/png");
    assert_eq!(image.bytes.len(), 4);
    assert!(payload.json_part().is_none());
    assert!(matches!(&payload.parts()[1], ClipboardPart::Text(t) if t == "hello"));
}

#[tokio::test]
async fn test_event_takes_precedence_over_fallback() {
    let event = PasteEvent::new(vec![Representation::text("JSON", layer_json("from-event"))]);

    let payload = import_from_clipboard(Some(&event), &FailingClipboard).await.unwrap().unwrap();
    assert_eq!(payload.octopus().unwrap().id, "from-event");
}

#[tokio::test]
async fn test_button_paste_reads_fallback_source() {
    let source = PasteEvent::new(vec![Representation::text("text/plain", "plain")]);

    let payload = import_from_clipboard(None, &source).await.unwrap().unwrap();
    assert_eq!(payload.texts().next(), Some("plain"));

    let empty = import_from_clipboard(None, &PasteEvent::default()).await.unwrap();
    assert!(empty.is_none());

    assert!(import_from_clipboard(None, &FailingClipboard).await.is_err());
}
