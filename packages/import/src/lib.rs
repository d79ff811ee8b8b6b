//! # OpenDesign Import
//!
//! Adapters between dropped design files and the canonical interchange
//! encoding.
//!
//! ```text
//! dropped bytes ─┬─ canonical? ──────────────┐
//!                └─ FormatConverter::convert ┴→ OctopusFile → Manifest → selection
//! ```
//!
//! Selection is mandatory: a file can hold many components and nothing here
//! guesses which one to open.

mod convert;
mod drop;
mod error;
mod file;
mod format;

pub use convert::{convert_to_canonical, ExternalConverter, FormatConverter, NoConverter};
pub use drop::{import_dropped_file, DroppedDesign};
pub use error::{ConversionError, ImportError};
pub use file::{is_optimized_octopus_file, read_manifest, OctopusFile, OCTOPUS_FILE_VERSION};
pub use format::DesignFormat;
