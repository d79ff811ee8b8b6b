//! # OpenDesign Engine
//!
//! Boundary between the document model and the native rendering engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: node tree, paste, image loading     │
//! └─────────────────────────────────────────────┘
//!                     ↓ with_scope(..)
//! ┌─────────────────────────────────────────────┐
//! │ engine: Scope + NativeEngine capability     │
//! │  - transient handles bound to a scope       │
//! │  - persistent component handles             │
//! │  - redraw requests                          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ native engine (or HeadlessEngine)           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every call that needs transient parameters (strings, error slots) runs
//! inside [`with_scope`]. Handles created there borrow the scope, so they
//! cannot be returned out of it, and the scope releases them when it ends,
//! including on early returns and panics.
//!
//! ```rust,ignore
//! let ok = with_scope(&engine, |scope| {
//!     let parent = create_string_ref(scope, "root");
//!     let before = create_string_ref(scope, "");
//!     let octopus = create_string_ref(scope, &json);
//!     let error = scope.error_slot();
//!     engine.insert_layer(component, parent, before, octopus, error)
//! });
//! ```

mod engine;
mod error;
mod handle;
mod headless;
mod scope;

pub use engine::{create_component, NativeEngine};
pub use error::EngineError;
pub use handle::{ComponentHandle, ErrorRef, RawHandle, StringRef};
pub use headless::HeadlessEngine;
pub use scope::{create_string_ref, with_scope, Scope};
