//! Photo attachments.
//!
//! Photos arrive as base64 strings, optionally wrapped in a data URI. They are
//! decoded, handed to a [`BlobStore`] under a name derived from the complaint
//! reference code, and the returned retrieval path is stored on the complaint.
//! A bad photo never blocks the operation it rides on.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

/// Public path prefix under which stored photos are served.
pub const UPLOADS_URL_PREFIX: &str = "/static/uploads";

/// Errors from decoding or storing an attachment.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Payload is not valid base64.
    #[error("invalid photo payload: {0}")]
    InvalidPayload(String),

    /// Payload decoded to nothing.
    #[error("photo payload is empty")]
    EmptyPayload,

    /// The blob store refused or failed the write.
    #[error("blob store error: {0}")]
    Store(String),
}

/// Where a photo was taken in the complaint's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentStage {
    Submission,
    Resolution,
}

impl AttachmentStage {
    fn prefix(&self) -> &'static str {
        match self {
            AttachmentStage::Submission => "",
            AttachmentStage::Resolution => "RES_",
        }
    }
}

/// External storage for photo bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `filename` and return a retrieval path.
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, AttachmentError>;
}

/// Blob store writing files into a directory served at [`UPLOADS_URL_PREFIX`].
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            url_prefix: UPLOADS_URL_PREFIX.to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, AttachmentError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(AttachmentError::Store(format!(
                "refusing unsafe filename: {filename}"
            )));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AttachmentError::Store(e.to_string()))?;
        tokio::fs::write(self.root.join(filename), bytes)
            .await
            .map_err(|e| AttachmentError::Store(e.to_string()))?;

        Ok(format!("{}/{}", self.url_prefix, filename))
    }
}

/// In-process blob store, for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get stored bytes by filename.
    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .ok()
            .and_then(|blobs| blobs.get(filename).cloned())
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, AttachmentError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AttachmentError::Store("blob map poisoned".to_string()))?;
        blobs.insert(filename.to_string(), bytes.to_vec());
        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, filename))
    }
}

/// Decode a base64 photo, stripping a data-URI header if present.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, AttachmentError> {
    let payload = payload.trim();
    let data = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| AttachmentError::InvalidPayload(e.to_string()))?;
    if bytes.is_empty() {
        return Err(AttachmentError::EmptyPayload);
    }
    Ok(bytes)
}

/// Name a stored photo: `[RES_]<reference code>_<unix seconds>.jpg`.
pub fn attachment_filename(
    reference_code: &str,
    stage: AttachmentStage,
    now: DateTime<Utc>,
) -> String {
    format!("{}{}_{}.jpg", stage.prefix(), reference_code, now.timestamp())
}

/// Decodes photo payloads and persists them through a [`BlobStore`].
#[derive(Clone)]
pub struct MediaHandler {
    store: Arc<dyn BlobStore>,
}

impl MediaHandler {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Decode and store a photo, returning its retrieval path.
    pub async fn attach(
        &self,
        payload: &str,
        reference_code: &str,
        stage: AttachmentStage,
    ) -> Result<String, AttachmentError> {
        let bytes = decode_payload(payload)?;
        let filename = attachment_filename(reference_code, stage, Utc::now());
        let reference = self.store.put(&filename, &bytes).await?;
        debug!(complaint_id = %reference_code, path = %reference, size = bytes.len(), "Photo stored");
        Ok(reference)
    }

    /// Like [`attach`](Self::attach), but a blank payload yields `None` and a
    /// failure is logged and also yields `None`.
    pub async fn attach_optional(
        &self,
        payload: Option<&str>,
        reference_code: &str,
        stage: AttachmentStage,
    ) -> Option<String> {
        let payload = payload.map(str::trim).filter(|p| !p.is_empty())?;
        match self.attach(payload, reference_code, stage).await {
            Ok(reference) => Some(reference),
            Err(err) => {
                warn!(
                    complaint_id = %reference_code,
                    stage = ?stage,
                    error = %err,
                    "Photo could not be saved; continuing without it"
                );
                None
            }
        }
    }
}
