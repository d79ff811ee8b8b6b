//! Error types for the editor

use opendesign_engine::EngineError;
use opendesign_import::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// The engine refused a layer description; `message` is the engine's own text
    #[error("Engine rejected layer: {message}")]
    EngineParse { message: String },

    #[error("Paste payload has no usable design part")]
    MissingOctopusPart,

    #[error("Layer id '{0}' is already used in this component")]
    DuplicateLayerId(String),

    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    #[error("Component '{0}' not found")]
    ComponentNotFound(String),

    #[error("Engine refused to remove layer: {message}")]
    LayerRemoval { message: String },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
