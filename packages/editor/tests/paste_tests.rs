//! Paste flow: design part insertion, image resolution, failure modes

use opendesign_clipboard::{import_from_representations, ImportedClipboardPayload, Representation};
use opendesign_common::{DirectoryAssetSource, LayerType, MemoryAssetSource, OctopusComponent, OctopusLayer};
use opendesign_editor::{
    Editor, EditorError, EngineImageLoader, InsertPosition, LayerContainer, PasteFailure, PasteState,
};
use opendesign_engine::HeadlessEngine;
use opendesign_import::{import_dropped_file, NoConverter, OctopusFile};
use opendesign_manifest::{Manifest, ManifestComponent, ManifestPage};
use serde_json::json;
use std::sync::Arc;

fn picture(id: &str, image: &str) -> String {
    json!({
        "id": id,
        "type": "SHAPE",
        "shape": {
            "fills": [{ "type": "IMAGE", "image": { "ref": { "type": "PATH", "value": image } } }]
        }
    })
    .to_string()
}

fn payload(representations: Vec<Representation>) -> ImportedClipboardPayload {
    import_from_representations(representations).unwrap()
}

fn editor_with(engine: &Arc<HeadlessEngine>, assets: MemoryAssetSource) -> Editor {
    Editor::empty(engine.clone(), Box::new(EngineImageLoader::new(assets))).unwrap()
}

#[tokio::test]
async fn test_paste_resolves_referenced_image() {
    let engine = Arc::new(HeadlessEngine::new());
    let mut assets = MemoryAssetSource::new();
    assets.add_asset("images/a.png", b"png".to_vec());
    let mut editor = editor_with(&engine, assets);

    let outcome = editor
        .paste(&payload(vec![
            Representation::text("text", "ignored"),
            Representation::text("JSON", picture("L1", "images/a.png")),
        ]))
        .await
        .unwrap();

    assert_eq!(outcome.layer_id, "L1");
    assert_eq!(
        outcome.history,
        vec![
            PasteState::Idle,
            PasteState::LayerInserted,
            PasteState::ImagesResolving,
            PasteState::Complete
        ]
    );
    assert!(outcome.warnings.is_empty());
    assert_eq!(engine.image("images/a.png"), Some(b"png".to_vec()));
    // one for the insertion, one after images
    assert_eq!(engine.redraw_count(), 2);

    let component = editor.current_component().unwrap();
    assert_eq!(component.find_layer("L1").unwrap().parent_id(), Some("root"));
    assert_eq!(engine.live_handle_count(), 0);
}

#[tokio::test]
async fn test_pasted_image_bytes_are_used_before_assets() {
    let engine = Arc::new(HeadlessEngine::new());
    let mut editor = editor_with(&engine, MemoryAssetSource::new());

    let outcome = editor
        .paste(&payload(vec![
            Representation::text("JSON", picture("L1", "images/inline.png")),
            Representation::bytes("image/png", b"inline".to_vec()).with_name("images/inline.png"),
        ]))
        .await
        .unwrap();

    assert!(outcome.warnings.is_empty());
    assert_eq!(engine.image("images/inline.png"), Some(b"inline".to_vec()));
}

#[tokio::test]
async fn test_failing_image_degrades_to_warning() {
    let engine = Arc::new(HeadlessEngine::new());
    let mut assets = MemoryAssetSource::new();
    assets.add_asset("images/empty.png", Vec::new());
    let mut editor = editor_with(&engine, assets);

    let group = json!({
        "id": "G",
        "type": "GROUP",
        "layers": [
            serde_json::from_str::<serde_json::Value>(&picture("missing", "images/missing.png")).unwrap(),
            serde_json::from_str::<serde_json::Value>(&picture("empty", "images/empty.png")).unwrap()
        ]
    });
    let outcome = editor
        .paste(&payload(vec![Representation::text("JSON", group.to_string())]))
        .await
        .unwrap();

    assert_eq!(outcome.state(), PasteState::Complete);
    let failed: Vec<&str> = outcome.warnings.iter().map(|w| w.image.as_str()).collect();
    assert_eq!(failed, vec!["images/missing.png", "images/empty.png"]);
    assert!(outcome.warnings[1].reason.contains("has no data"));

    let component = editor.current_component().unwrap();
    assert_eq!(component.root().ids(), vec!["root", "G", "missing", "empty"]);
    assert_eq!(engine.redraw_count(), 2);
}

#[tokio::test]
async fn test_unavailable_asset_directory_still_completes() {
    let engine = Arc::new(HeadlessEngine::new());
    let dir = tempfile::tempdir().unwrap();
    let loader = EngineImageLoader::new(DirectoryAssetSource::new(dir.path().join("absent")));
    let mut editor = Editor::empty(engine.clone(), Box::new(loader)).unwrap();

    let outcome = editor
        .paste(&payload(vec![Representation::text("JSON", picture("L1", "a.png"))]))
        .await
        .unwrap();

    assert_eq!(outcome.state(), PasteState::Complete);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(engine.image("a.png").is_none());
}

#[tokio::test]
async fn test_directory_assets_are_fetched() {
    let engine = Arc::new(HeadlessEngine::new());
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::create_dir_all(dir.path().join("images")).await.unwrap();
    tokio::fs::write(dir.path().join("images/a.png"), b"from-disk").await.unwrap();
    let loader = EngineImageLoader::new(DirectoryAssetSource::new(dir.path()));
    let mut editor = Editor::empty(engine.clone(), Box::new(loader)).unwrap();

    let outcome = editor
        .paste(&payload(vec![Representation::text("JSON", picture("L1", "images/a.png"))]))
        .await
        .unwrap();

    assert!(outcome.warnings.is_empty());
    assert_eq!(engine.image("images/a.png"), Some(b"from-disk".to_vec()));
}

#[tokio::test]
async fn test_missing_design_part_mutates_nothing() {
    let engine = Arc::new(HeadlessEngine::new());
    let mut editor = editor_with(&engine, MemoryAssetSource::new());
    let before = editor.current_component().unwrap().root().clone();

    let text_only = payload(vec![Representation::text("text/plain", "just words")]);
    assert!(matches!(
        editor.paste(&text_only).await,
        Err(EditorError::MissingOctopusPart)
    ));

    let malformed = payload(vec![Representation::text("JSON", "{ not json")]);
    assert!(matches!(
        editor.paste(&malformed).await,
        Err(EditorError::MissingOctopusPart)
    ));

    assert_eq!(editor.current_component().unwrap().root(), &before);
    assert_eq!(
        editor.current_component().unwrap().last_paste(),
        &[PasteState::Idle, PasteState::Failed(PasteFailure::MissingOctopusPart)]
    );
    assert_eq!(engine.redraw_count(), 0);
    let handle = editor.current_component().unwrap().handle();
    assert_eq!(engine.layer_ids(handle).unwrap(), vec!["root"]);
}

#[tokio::test]
async fn test_engine_rejection_fails_paste() {
    let engine = Arc::new(HeadlessEngine::new());
    let images = EngineImageLoader::new(MemoryAssetSource::new());
    let mut editor = Editor::empty(engine.clone(), Box::new(EngineImageLoader::new(MemoryAssetSource::new()))).unwrap();

    let shared: Arc<HeadlessEngine> = engine.clone();
    editor
        .document_mut()
        .component_mut("component-1")
        .unwrap()
        .create_layer(&*shared, "root", InsertPosition::Append, &OctopusLayer::new("leaf", LayerType::Shape))
        .unwrap();
    let redraws = engine.redraw_count();

    let mut cursor = editor.document_mut().layer_mut("component-1", "leaf").unwrap();
    let err = cursor
        .paste(&payload(vec![Representation::text("JSON", picture("L1", "a.png"))]), &images)
        .await
        .unwrap_err();

    assert!(matches!(err, EditorError::EngineParse { message } if message.contains("cannot have children")));
    assert_eq!(
        editor.current_component().unwrap().last_paste(),
        &[
            PasteState::Idle,
            PasteState::LayerInserted,
            PasteState::Failed(PasteFailure::EngineParse)
        ]
    );
    assert_eq!(engine.redraw_count(), redraws);
    assert!(engine.image("a.png").is_none());
}

#[tokio::test]
async fn test_pasting_same_layer_twice_is_rejected() {
    let engine = Arc::new(HeadlessEngine::new());
    let mut editor = editor_with(&engine, MemoryAssetSource::new());
    let clip = payload(vec![Representation::text(
        "JSON",
        json!({ "id": "L1", "type": "TEXT", "text": { "value": "hi" } }).to_string(),
    )]);

    editor.paste(&clip).await.unwrap();
    assert_eq!(editor.current_component().unwrap().last_paste().last(), Some(&PasteState::Complete));

    assert!(matches!(
        editor.paste(&clip).await,
        Err(EditorError::DuplicateLayerId(id)) if id == "L1"
    ));
    assert_eq!(
        editor.current_component().unwrap().last_paste(),
        &[PasteState::Idle, PasteState::Failed(PasteFailure::InvalidTarget)]
    );
}

#[tokio::test]
async fn test_open_dropped_design() {
    let engine = Arc::new(HeadlessEngine::new());
    let file = OctopusFile::new(Manifest::new(
        vec![ManifestPage::new("Page1Id", "Page 1", &["c1"])],
        vec![ManifestComponent::new("c1", "Home")],
    ))
    .with_component(OctopusComponent::new("c1", OctopusLayer::new("c1-root", LayerType::Group)));
    let dropped = import_dropped_file(file.to_bytes().unwrap(), &NoConverter).await.unwrap();

    let mut editor = Editor::open_dropped(
        engine.clone(),
        &dropped,
        "c1",
        Box::new(EngineImageLoader::new(MemoryAssetSource::new())),
    )
    .unwrap();

    assert_eq!(editor.current_page().unwrap().name(), "Page 1");
    assert_eq!(editor.current_component().unwrap().name(), "Home");
    assert!(matches!(editor.select_component("c9"), Err(EditorError::ComponentNotFound(_))));

    let outcome = editor
        .paste(&payload(vec![Representation::text("JSON", picture("pasted", "none.png"))]))
        .await
        .unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(
        editor.current_component().unwrap().find_layer("pasted").unwrap().parent_id(),
        Some("c1-root")
    );

    let err = Editor::open_dropped(
        engine.clone(),
        &dropped,
        "nope",
        Box::new(EngineImageLoader::new(MemoryAssetSource::new())),
    );
    assert!(matches!(err, Err(EditorError::Import(_))));
}
