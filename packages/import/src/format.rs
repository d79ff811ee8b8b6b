use std::fmt;

use crate::is_optimized_octopus_file;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const XD_MIMETYPE: &[u8] = b"application/vnd.adobe.sparkler";
const SKETCH_DOCUMENT: &[u8] = b"document.json";

/// Design formats recognizable from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignFormat {
    Octopus,
    Figma,
    Sketch,
    Xd,
    Photoshop,
    Illustrator,
    /// ZIP container that is neither Sketch nor XD
    Zip,
    Unknown,
}

impl DesignFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        if is_optimized_octopus_file(bytes) {
            DesignFormat::Octopus
        } else if bytes.starts_with(b"fig-kiwi") {
            DesignFormat::Figma
        } else if bytes.starts_with(b"8BPS") {
            DesignFormat::Photoshop
        } else if bytes.starts_with(b"%PDF") {
            DesignFormat::Illustrator
        } else if bytes.starts_with(ZIP_MAGIC) {
            // entry names in local headers are stored uncompressed
            if contains(bytes, XD_MIMETYPE) {
                DesignFormat::Xd
            } else if contains(bytes, SKETCH_DOCUMENT) {
                DesignFormat::Sketch
            } else {
                DesignFormat::Zip
            }
        } else {
            DesignFormat::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignFormat::Octopus => "octopus",
            DesignFormat::Figma => "figma",
            DesignFormat::Sketch => "sketch",
            DesignFormat::Xd => "xd",
            DesignFormat::Photoshop => "photoshop",
            DesignFormat::Illustrator => "illustrator",
            DesignFormat::Zip => "zip",
            DesignFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DesignFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
