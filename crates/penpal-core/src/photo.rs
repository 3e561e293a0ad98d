//! Photo ingestion: turn a local image into an embeddable data URI.

use crate::decoration::DecorationKind;
use crate::tools::ToolbarChoice;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use thiserror::Error;

/// Photo ingestion errors.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Image is empty")]
    Empty,
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Image formats accepted for photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
}

impl ImageFormat {
    /// Detect the format from magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }
}

/// An image ready to be placed as a photo decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoData {
    format: ImageFormat,
    data_uri: String,
}

impl PhotoData {
    /// Encode raw image bytes as `data:<mime>;base64,<payload>`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhotoError> {
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        let format = ImageFormat::detect(bytes).ok_or(PhotoError::UnsupportedFormat)?;
        let data_uri = format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes));
        log::debug!("encoded {} photo ({} bytes)", format.mime(), bytes.len());
        Ok(Self { format, data_uri })
    }

    /// Read and encode an image file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}

impl From<PhotoData> for DecorationKind {
    fn from(photo: PhotoData) -> Self {
        DecorationKind::Photo { src: photo.data_uri }
    }
}

impl From<PhotoData> for ToolbarChoice {
    fn from(photo: PhotoData) -> Self {
        ToolbarChoice::Photo(photo.data_uri)
    }
}
