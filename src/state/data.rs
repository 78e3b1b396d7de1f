/// Shared data structures for the analysis session
///
/// These structs represent the data that flows between image acquisition,
/// the session controller, the inference backend and the UI layer.

use std::fmt;
use std::sync::Arc;

use image::ImageFormat;

use crate::error::InputError;

/// Image formats accepted for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Detect the format from the file's magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Raw bytes of a user-selected image
///
/// Cloning is cheap: the bytes are shared between the session and any
/// in-flight preview or analysis job.
#[derive(Clone, PartialEq)]
pub struct ImagePayload {
    /// File name only (e.g., "reef_01.jpg")
    file_name: String,
    bytes: Arc<[u8]>,
    /// None when the bytes are not a supported image
    kind: Option<ImageKind>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let kind = ImageKind::sniff(&bytes);
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            kind,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn kind(&self) -> Option<ImageKind> {
        self.kind
    }

    /// Check the payload against the acquisition constraints
    pub fn validate(&self, max_bytes: u64) -> Result<ImageKind, InputError> {
        if self.is_empty() {
            return Err(InputError::Empty);
        }
        if self.len() > max_bytes {
            return Err(InputError::TooLarge {
                size: self.len(),
                limit: max_bytes,
            });
        }
        self.kind.ok_or(InputError::UnsupportedFormat)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Downscaled, displayable rendition of the selected image
#[derive(Clone, PartialEq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    /// JPEG-encoded thumbnail
    pub jpeg: Arc<[u8]>,
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("jpeg_len", &self.jpeg.len())
            .finish()
    }
}
