//! Development `MediaStore` that keeps nothing and returns stable URLs.
//!
//! The URL is derived from the SHA-256 of the file contents, so uploading
//! the same photo twice yields the same link.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use url::Url;

use crate::domain::ports::{MediaStore, MediaStoreError, MediaUpload};

pub const DEFAULT_FIXTURE_MEDIA_BASE: &str = "https://media.traveltrove.invalid/";

const DIGEST_HEX_CHARS: usize = 24;

#[derive(Debug, Clone)]
pub struct FixtureMediaStore {
    base: Url,
}

impl FixtureMediaStore {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    fn extension(upload: &MediaUpload) -> &str {
        upload
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin")
    }
}

#[async_trait]
impl MediaStore for FixtureMediaStore {
    async fn upload(&self, folder: &str, upload: MediaUpload) -> Result<String, MediaStoreError> {
        upload.ensure_image()?;
        let digest = hex::encode(Sha256::digest(&upload.bytes));
        let name = format!(
            "{folder}/{}.{}",
            &digest[..DIGEST_HEX_CHARS],
            Self::extension(&upload).to_ascii_lowercase()
        );
        self.base
            .join(&name)
            .map(String::from)
            .map_err(|err| MediaStoreError::decode(format!("fixture url {name}: {err}")))
    }
}
