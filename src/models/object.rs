//! Listing shapes derived from provider object records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single stored object, as reported by the provider listing.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FileInfo {
    /// Full object key within the bucket.
    pub key: String,

    /// Last path segment of the key.
    pub filename: String,

    /// Object size in bytes.
    pub size: i64,

    /// Provider-reported last modification time.
    pub last_modified: DateTime<Utc>,

    /// Entity tag with surrounding quotes stripped, when present.
    pub etag: Option<String>,
}

/// One page of a listing, sorted by modification time descending.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FileListing {
    /// Entries for the requested page. Empty when the page is out of range.
    pub files: Vec<FileInfo>,

    /// Total number of objects under the prefix, across all pages.
    pub total_count: usize,

    /// Requested page number (1-indexed).
    pub page: usize,

    /// Requested page size.
    pub page_size: usize,

    /// Total number of pages at `page_size`.
    pub total_pages: usize,
}
