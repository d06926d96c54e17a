//! Port for listing photo storage.
use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

/// Folder listing photos are stored under.
pub const LISTING_MEDIA_FOLDER: &str = "properties";

define_port_error! {
    pub enum MediaStoreError {
        Transport { message: String } => "media upload failed: {message}",
        Rejected { status: u16, message: String } => "media store rejected the upload ({status}): {message}",
        Decode { message: String } => "media store response was malformed: {message}",
        /// The file is not an image or is empty.
        Unsupported { message: String } => "unsupported upload: {message}",
    }
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Reject empty files and anything not declared as an image.
    pub fn ensure_image(&self) -> Result<(), MediaStoreError> {
        if self.bytes.is_empty() {
            return Err(MediaStoreError::unsupported(format!(
                "{} is empty",
                self.file_name
            )));
        }
        match self.content_type.as_deref() {
            Some(kind) if kind.starts_with("image/") => Ok(()),
            Some(kind) => Err(MediaStoreError::unsupported(format!(
                "{} has content type {kind}",
                self.file_name
            ))),
            None => Err(MediaStoreError::unsupported(format!(
                "{} has no content type",
                self.file_name
            ))),
        }
    }
}

impl From<MediaStoreError> for Error {
    fn from(err: MediaStoreError) -> Self {
        match err {
            MediaStoreError::Unsupported { .. } => {
                Error::invalid_field("images", "unsupported_media", err.to_string())
            }
            MediaStoreError::Transport { .. } => Error::service_unavailable(err.to_string()),
            MediaStoreError::Rejected { .. } | MediaStoreError::Decode { .. } => {
                Error::internal(err.to_string())
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `upload` under `folder`, returning its public HTTPS URL.
    async fn upload(&self, folder: &str, upload: MediaUpload) -> Result<String, MediaStoreError>;
}
