//! # OpenDesign Editor
//!
//! Document model and merge logic on top of the native engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ import / clipboard: bytes → OctopusFile,    │
//! │                     paste → payload         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: node tree + mutations               │
//! │  - Load documents into engine components    │
//! │  - Insert / remove layers with validation   │
//! │  - Paste: insert layer, then load images    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ engine: NativeEngine (scoped handles)       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Engine first**: the tree changes only after the engine accepted
//! 2. **Scopes stay synchronous**: no scope lives across an `.await`
//! 3. **Images are best effort**: a missing bitmap never fails a paste
//!
//! ## Usage
//!
//! ```rust,ignore
//! use opendesign_editor::{Editor, EngineImageLoader};
//!
//! let mut editor = Editor::empty(engine, Box::new(EngineImageLoader::new(assets)))?;
//! let outcome = editor.paste(&payload).await?;
//! for warning in &outcome.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

mod editor;
mod errors;
mod images;
pub mod nodes;
mod paste;

pub use editor::Editor;
pub use errors::EditorError;
pub use images::{EngineImageLoader, ImageLoadError, ImageLoadReport, ImageLoadWarning, ImageLoader};
pub use nodes::{
    BaseNode, ComponentNode, ComponentSelection, DocumentNode, InsertPosition, LayerContainer, LayerCursor, LayerNode,
    Node, NodeType, PageNode, OTHER_PAGE_ID,
};
pub use paste::{PasteFailure, PasteOutcome, PasteState};
