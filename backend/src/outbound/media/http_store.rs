//! Reqwest-backed `MediaStore` speaking the Cloudinary unsigned-upload API.
//!
//! `POST {endpoint}` with multipart fields `file`, `upload_preset` and
//! `folder`; the reply's `secure_url` is the stored image's public URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{MediaStore, MediaStoreError, MediaUpload};

#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: String,
}

pub struct HttpMediaStore {
    client: Client,
    endpoint: Url,
    upload_preset: String,
}

impl HttpMediaStore {
    /// # Errors
    /// Fails when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        upload_preset: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            upload_preset: upload_preset.into(),
        })
    }
}

fn file_part(upload: MediaUpload) -> Result<Part, MediaStoreError> {
    let MediaUpload {
        file_name,
        content_type,
        bytes,
    } = upload;
    let part = Part::bytes(bytes).file_name(file_name);
    match content_type {
        Some(kind) => part
            .mime_str(&kind)
            .map_err(|err| MediaStoreError::unsupported(format!("content type {kind}: {err}"))),
        None => Ok(part),
    }
}

fn parse_reply(body: &[u8]) -> Result<String, MediaStoreError> {
    let reply: UploadReply =
        serde_json::from_slice(body).map_err(|err| MediaStoreError::decode(err.to_string()))?;
    let url = Url::parse(&reply.secure_url)
        .map_err(|err| MediaStoreError::decode(format!("secure_url: {err}")))?;
    if url.scheme() != "https" {
        return Err(MediaStoreError::decode(format!(
            "secure_url is not https: {url}"
        )));
    }
    Ok(reply.secure_url)
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, folder: &str, upload: MediaUpload) -> Result<String, MediaStoreError> {
        upload.ensure_image()?;
        let file_name = upload.file_name.clone();
        let size = upload.bytes.len();
        let form = Form::new()
            .part("file", file_part(upload)?)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", folder.to_owned());

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| MediaStoreError::transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| MediaStoreError::transport(err.to_string()))?;
        debug!(file = %file_name, size, status = status.as_u16(), "media upload finished");
        if !status.is_success() {
            let preview: String = String::from_utf8_lossy(&body).chars().take(160).collect();
            return Err(MediaStoreError::rejected(status.as_u16(), preview));
        }
        parse_reply(&body)
    }
}
