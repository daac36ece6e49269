//! Presigned-URL uploads
//!
//! The backend hands out a short-lived storage URL for each file; the bytes
//! then go straight to object storage with a plain `PUT`. That `PUT` carries no
//! session credentials and is not subject to refresh/retry.

use super::instructor::INSTRUCTOR_COURSES;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient};
use crate::types::{FileKind, Seconds};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A file ready to be uploaded
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name reported to the backend
    pub file_name: String,
    /// MIME type, sent as `Content-Type` on the storage `PUT`
    pub content_type: String,
    /// File contents
    pub bytes: Bytes,
}

impl UploadFile {
    /// Create a file from in-memory bytes
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::upload(format!("not a file: {}", path.display())))?;
        let content_type = content_type_for(&file_name).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes: Bytes::from(bytes),
        })
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME type for common course media extensions
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Where an uploaded file belongs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTarget {
    pub kind: FileKind,
    pub module_index: Option<usize>,
    pub lesson_index: Option<usize>,
}

impl UploadTarget {
    /// Course thumbnail
    pub fn thumbnail() -> Self {
        Self {
            kind: FileKind::Thumbnail,
            module_index: None,
            lesson_index: None,
        }
    }

    /// Video of one lesson
    pub fn lesson_video(module_index: usize, lesson_index: usize) -> Self {
        Self {
            kind: FileKind::Video,
            module_index: Some(module_index),
            lesson_index: Some(lesson_index),
        }
    }
}

/// Body of `POST /instructor/courses/presigned-url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlRequest {
    pub file_type: FileKind,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_index: Option<usize>,
}

/// Presigned storage location returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUpload {
    pub url: String,
    pub key: String,
}

/// Result of a finished upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    /// Storage key to reference from the course or lesson
    pub key: String,
    /// Video length, when a probe was configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Seconds>,
}

/// Failure of a media probe
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ProbeError(pub String);

impl From<ProbeError> for Error {
    fn from(e: ProbeError) -> Self {
        Error::probe(e.0)
    }
}

/// Reads the duration of a video before it is uploaded
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Duration of `file` in seconds
    async fn probe_duration(&self, file: &UploadFile) -> std::result::Result<Seconds, ProbeError>;
}

/// Presigned upload flow
#[derive(Clone)]
pub struct Uploader {
    client: Arc<HttpClient>,
    storage: reqwest::Client,
    probe: Option<Arc<dyn MediaProbe>>,
}

impl Uploader {
    /// Create an uploader; storage `PUT`s use a separate credential-less client
    pub fn new(client: Arc<HttpClient>) -> Result<Self> {
        let storage = reqwest::Client::builder()
            .user_agent(&client.config().user_agent)
            .timeout(client.config().timeout())
            .build()?;
        Ok(Self {
            client,
            storage,
            probe: None,
        })
    }

    /// Probe video durations before uploading
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn MediaProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Ask the backend for a presigned URL
    pub async fn presign(&self, target: UploadTarget, file_name: &str) -> Result<PresignedUpload> {
        let body = PresignedUrlRequest {
            file_type: target.kind,
            file_name: file_name.to_string(),
            module_index: target.module_index,
            lesson_index: target.lesson_index,
        };
        let path = format!("{INSTRUCTOR_COURSES}/presigned-url");
        self.client
            .send_json(ApiRequest::post(path).body(&body)?)
            .await
    }

    /// `PUT` the bytes to a presigned URL
    pub async fn put_object(&self, presigned: &PresignedUpload, file: &UploadFile) -> Result<()> {
        let response = self
            .storage
            .put(&presigned.url)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upload(format!(
                "storage rejected {} with HTTP {}: {body}",
                presigned.key,
                status.as_u16()
            )));
        }
        Ok(())
    }

    /// Presign, optionally probe, and upload one file
    pub async fn upload(&self, target: UploadTarget, file: &UploadFile) -> Result<UploadedFile> {
        let duration = match (&self.probe, target.kind) {
            (Some(probe), FileKind::Video) => Some(probe.probe_duration(file).await?),
            _ => None,
        };

        let presigned = self.presign(target, &file.file_name).await?;
        debug!(
            "Uploading {} ({} bytes) to {}",
            file.file_name,
            file.len(),
            presigned.key
        );
        self.put_object(&presigned, file).await?;
        info!("Uploaded {} as {}", file.file_name, presigned.key);

        Ok(UploadedFile {
            key: presigned.key,
            duration,
        })
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("has_probe", &self.probe.is_some())
            .finish_non_exhaustive()
    }
}
