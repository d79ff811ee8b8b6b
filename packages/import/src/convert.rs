use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::{is_optimized_octopus_file, ConversionError, DesignFormat};

/// Converts a design from a legacy format to the canonical encoding
#[async_trait]
pub trait FormatConverter: Send + Sync {
    async fn convert(&self, bytes: &[u8], format: DesignFormat) -> Result<Vec<u8>, ConversionError>;
}

/// Converter that accepts nothing; used when no external converter is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConverter;

#[async_trait]
impl FormatConverter for NoConverter {
    async fn convert(&self, _bytes: &[u8], format: DesignFormat) -> Result<Vec<u8>, ConversionError> {
        Err(ConversionError::Unsupported { format })
    }
}

/// Runs an external program that reads the design on stdin and writes
/// canonical bytes to stdout. The sniffed format is passed in
/// `OPENDESIGN_SOURCE_FORMAT`.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    program: String,
    args: Vec<String>,
}

impl ExternalConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl FormatConverter for ExternalConverter {
    async fn convert(&self, bytes: &[u8], format: DesignFormat) -> Result<Vec<u8>, ConversionError> {
        debug!(program = %self.program, %format, "Spawning external converter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("OPENDESIGN_SOURCE_FORMAT", format.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            ConversionError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "converter stdin unavailable"))
        })?;

        // feed stdin while draining stdout so large designs cannot deadlock the pipes
        let write = async move {
            let result = stdin.write_all(bytes).await;
            drop(stdin);
            result
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(ConversionError::ConverterFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // a converter may legitimately stop reading early, so only surface
        // write errors when it also failed to produce output
        if let Err(e) = written {
            if output.stdout.is_empty() {
                return Err(e.into());
            }
        }
        if !is_optimized_octopus_file(&output.stdout) {
            return Err(ConversionError::InvalidOutput);
        }
        Ok(output.stdout)
    }
}

/// Bring `bytes` into the canonical encoding.
///
/// Canonical input is returned unchanged without touching the converter.
pub async fn convert_to_canonical(
    bytes: Vec<u8>,
    converter: &dyn FormatConverter,
) -> Result<Vec<u8>, ConversionError> {
    if is_optimized_octopus_file(&bytes) {
        debug!(size = bytes.len(), "Design already canonical");
        return Ok(bytes);
    }

    let format = DesignFormat::sniff(&bytes);
    info!(%format, size = bytes.len(), "Converting design to octopus");
    converter.convert(&bytes, format).await
}
