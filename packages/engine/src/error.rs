//! Error types for the engine boundary

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Engine rejected component {id}: {message}")]
    ComponentCreation { id: String, message: String },

    #[error("Handle is no longer live: {0}")]
    StaleHandle(String),

    #[error("Failed to serialize octopus: {0}")]
    Serialize(String),
}
