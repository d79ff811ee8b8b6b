//! # OpenDesign Clipboard
//!
//! Turns the representations of one paste or drop event into an
//! [`ImportedClipboardPayload`].
//!
//! The pipeline only extracts and normalizes. Merging into a document is the
//! caller's job (see `opendesign-editor`), so a payload can be inspected or
//! redirected before anything touches the tree.

mod payload;
mod pipeline;
mod source;

pub use payload::{ClipboardPart, ImagePart, ImportedClipboardPayload, JsonPart, PartKind};
pub use pipeline::{classify, import_from_clipboard, import_from_representations};
pub use source::{ClipboardError, ClipboardSource, PasteEvent, Representation, RepresentationData};
