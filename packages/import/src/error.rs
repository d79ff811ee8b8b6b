//! Error types for import

use thiserror::Error;

use crate::DesignFormat;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("No converter available for {format} files")]
    Unsupported { format: DesignFormat },

    #[error("Converter failed with {status}: {stderr}")]
    ConverterFailed { status: String, stderr: String },

    #[error("Converter produced non-canonical output")]
    InvalidOutput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Malformed octopus file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Component {0} is not part of this design")]
    UnknownComponent(String),
}
