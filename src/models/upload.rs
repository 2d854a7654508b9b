//! Request and response shapes for the multipart upload lifecycle.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller's description of the file it intends to upload.
///
/// `file_size` is the total object size; the broker derives the part count
/// from it. When `custom_key` is unset, the broker generates a date-based
/// key from `filename`, which then must not contain path separators.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UploadRequest {
    /// Name of the file being uploaded.
    pub filename: String,

    /// Total size of the file in bytes.
    pub file_size: u64,

    /// MIME type stored on the object. Defaults to
    /// `application/octet-stream` when unset.
    pub content_type: Option<String>,

    /// Custom metadata attached to the object at creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Explicit object key, overriding date-based key generation.
    pub custom_key: Option<String>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, file_size: u64) -> Self {
        Self {
            filename: filename.into(),
            file_size,
            content_type: None,
            metadata: HashMap::new(),
            custom_key: None,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn custom_key(mut self, key: impl Into<String>) -> Self {
        self.custom_key = Some(key.into());
        self
    }
}

/// Result of a successful upload initiation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InitiatedUpload {
    /// Provider-issued identifier for the multipart upload session.
    pub upload_id: String,

    /// Object key the file will land under.
    pub key: String,

    /// Bucket the upload targets.
    pub bucket: String,

    /// Number of parts the file splits into at the configured part size.
    pub parts_count: u64,

    /// Size of each part in bytes (the last part may be smaller).
    pub part_size: u64,
}

/// A presigned URL for uploading one part directly to the provider.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PresignedPartUrl {
    /// Time-limited URL the caller PUTs the part's bytes to.
    pub url: String,

    /// Part number this URL was signed for (1-indexed).
    pub part_number: i32,

    /// Seconds until the URL expires.
    pub expires_in: u64,
}

/// One uploaded part, referenced back at completion time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadPart {
    /// Part number (1-indexed, at most 10000).
    pub part_number: i32,

    /// Entity tag the provider returned when the part was uploaded.
    pub etag: String,
}

impl UploadPart {
    pub fn new(part_number: i32, etag: impl Into<String>) -> Self {
        Self {
            part_number,
            etag: etag.into(),
        }
    }
}

/// Result of finalizing a multipart upload.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CompletedUpload {
    /// Always `true` on the success path; kept for callers that forward
    /// this shape as an API response.
    pub success: bool,

    /// Provider-reported location of the assembled object.
    pub location: String,

    /// Object key of the assembled object.
    pub key: String,

    /// Bucket the object lives in.
    pub bucket: String,
}
