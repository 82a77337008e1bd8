use std::path::Path;

use crate::error::{AppError, ValidationError};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// The raw blob handed over by whatever picked the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyFile);
        }

        // The service decides whether it can decode the image; we only label it.
        let mime_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_MIME_TYPE);

        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::ReadImage(e, path.display().to_string()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes)?)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Never zero: empty files are rejected on construction.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}
