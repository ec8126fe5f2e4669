//! Output formats, encoded results, and encoding errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The surface had no pixels to encode, or the encoder wrote nothing
    #[error("Encoding produced no data ({width}x{height})")]
    EmptyEncode { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Downloadable output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy, quality 1-100, transparency composited over black.
    Jpeg,
}

impl OutputFormat {
    /// MIME type, as used for `canvas.toBlob` and download links.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension used for downloads.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Parse a MIME type (`image/png`, `image/jpeg`) or a bare name
    /// (`png`, `jpeg`, `jpg`), case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image/png" | "png" => Some(OutputFormat::Png),
            "image/jpeg" | "image/jpg" | "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => f.write_str("PNG"),
            OutputFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Encoded bytes plus what they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_and_extension() {
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
    }

    #[test]
    fn test_parse() {
        assert_eq!(OutputFormat::parse("image/png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("IMAGE/JPEG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse(" jpg "), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("image/webp"), None);
        assert_eq!(OutputFormat::parse(""), None);
    }

    #[test]
    fn test_error_display() {
        let err = EncodeError::EmptyEncode {
            width: 0,
            height: 3,
        };
        assert_eq!(err.to_string(), "Encoding produced no data (0x3)");

        let err = EncodeError::EncodingFailed {
            format: OutputFormat::Jpeg,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "JPEG encoding failed: boom");
    }
}
