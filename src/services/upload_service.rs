//! src/services/upload_service.rs
//!
//! UploadService — orchestration of the multipart-upload lifecycle against
//! an S3-compatible provider: initiate, per-part presigned URL issuance,
//! completion/abort, plus listing, download URLs, deletion, and stale-upload
//! cleanup. This file intentionally keeps **no** local session state: every
//! operation re-derives its context from caller-supplied identifiers and the
//! provider stays the only source of truth for upload progress.

use crate::config::BrokerConfig;
use crate::errors::{BrokerError, BrokerResult};
use crate::models::{
    CompletedUpload, FileInfo, FileListing, InitiatedUpload, PresignedPartUrl, UploadPart,
    UploadRequest,
};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

/// Provider-imposed ceiling on multipart part numbers.
pub const MAX_PART_NUMBER: i32 = 10_000;

/// Prefix under which auto-generated keys are placed.
const DEFAULT_KEY_PREFIX: &str = "uploads";

/// Stateless facade over the provider's multipart upload API.
///
/// Holds only the validated configuration and the provider client handle;
/// both are read-only, so a single instance is safely shared across
/// concurrent callers. Concurrency between parts of one upload session is
/// the provider's concern, not this type's.
#[derive(Clone)]
pub struct UploadService {
    client: Client,
    config: BrokerConfig,
}

impl UploadService {
    /// Build a service and its provider client from a validated config.
    pub fn new(config: BrokerConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "multipart-broker",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .behavior_version(BehaviorVersion::latest());

        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        debug!(bucket = %config.bucket_name, region = %config.region, "provider client initialized");

        Self { client, config }
    }

    /// Build a service around an externally constructed client, e.g. one
    /// sharing credentials with the rest of the application.
    pub fn with_client(client: Client, config: BrokerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Start a multipart upload.
    ///
    /// Validation (size bounds, extension allow-list, filename shape) runs
    /// before any provider call, so a validation failure leaves no partial
    /// state on the provider side. The object key is either the caller's
    /// `custom_key` or `uploads/{yyyy}/{mm}/{dd}/{HHMMSS}_{filename}` in UTC.
    pub async fn initiate_upload(&self, request: UploadRequest) -> BrokerResult<InitiatedUpload> {
        self.validate_upload(&request)?;

        let key = match &request.custom_key {
            Some(key) => key.clone(),
            None => derive_key(DEFAULT_KEY_PREFIX, &request.filename, Utc::now()),
        };
        let content_type = request
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        let mut call = self
            .client
            .create_multipart_upload()
            .bucket(&self.config.bucket_name)
            .key(&key)
            .content_type(content_type);
        for (name, value) in &request.metadata {
            call = call.metadata(name, value);
        }

        let response = call
            .send()
            .await
            .map_err(|err| BrokerError::Initiation(format!("{}", DisplayErrorContext(&err))))?;

        let upload_id = response
            .upload_id()
            .ok_or_else(|| BrokerError::Initiation("provider returned no upload id".into()))?
            .to_string();
        let parts_count = parts_count(request.file_size, self.config.part_size);

        info!(
            upload_id = %upload_id,
            key = %key,
            parts_count,
            "initiated multipart upload for {}",
            request.filename
        );

        Ok(InitiatedUpload {
            upload_id,
            key,
            bucket: self.config.bucket_name.clone(),
            parts_count,
            part_size: self.config.part_size,
        })
    }

    /// Sign an upload-part URL for the given session and part number.
    ///
    /// Signing happens locally in the SDK; no network round trip is made.
    pub async fn presigned_part_url(
        &self,
        upload_id: &str,
        key: &str,
        part_number: i32,
    ) -> BrokerResult<PresignedPartUrl> {
        if !(1..=MAX_PART_NUMBER).contains(&part_number) {
            return Err(BrokerError::validation(format!(
                "part number {part_number} must be between 1 and {MAX_PART_NUMBER}"
            )));
        }

        let expires_in = self.config.presigned_url_expiry;
        let presigning = PresigningConfig::expires_in(StdDuration::from_secs(expires_in))
            .map_err(|err| BrokerError::Upload(format!("invalid presign expiry: {err}")))?;

        let presigned = self
            .client
            .upload_part()
            .bucket(&self.config.bucket_name)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .presigned(presigning)
            .await
            .map_err(|err| BrokerError::Upload(format!("{}", DisplayErrorContext(&err))))?;

        debug!(upload_id, key, part_number, "issued presigned part URL");

        Ok(PresignedPartUrl {
            url: presigned.uri().to_string(),
            part_number,
            expires_in,
        })
    }

    /// Finalize a multipart upload from the caller's part list.
    ///
    /// Ordering policy follows `strict_part_order` in the configuration:
    /// lenient mode sorts the parts ascending before submission, strict mode
    /// rejects unsorted input. Duplicate or out-of-range part numbers are
    /// rejected in both modes.
    pub async fn complete_upload(
        &self,
        upload_id: &str,
        key: &str,
        parts: Vec<UploadPart>,
    ) -> BrokerResult<CompletedUpload> {
        let ordered = order_parts(parts, self.config.strict_part_order)?;

        let completed: Vec<CompletedPart> = ordered
            .iter()
            .map(|part| {
                CompletedPart::builder()
                    .part_number(part.part_number)
                    .e_tag(&part.etag)
                    .build()
            })
            .collect();
        let multipart = CompletedMultipartUpload::builder()
            .set_parts(Some(completed))
            .build();

        let response = self
            .client
            .complete_multipart_upload()
            .bucket(&self.config.bucket_name)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(multipart)
            .send()
            .await
            .map_err(|err| BrokerError::Upload(format!("{}", DisplayErrorContext(&err))))?;

        info!(upload_id, key, parts = ordered.len(), "completed multipart upload");

        Ok(CompletedUpload {
            success: true,
            location: response.location().unwrap_or_default().to_string(),
            key: key.to_string(),
            bucket: self.config.bucket_name.clone(),
        })
    }

    /// Abort an in-progress upload. Best-effort: existence of the session
    /// is the provider's call, not checked locally.
    pub async fn abort_upload(&self, upload_id: &str, key: &str) -> BrokerResult<()> {
        self.client
            .abort_multipart_upload()
            .bucket(&self.config.bucket_name)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(|err| BrokerError::Upload(format!("{}", DisplayErrorContext(&err))))?;

        info!(upload_id, key, "aborted multipart upload");
        Ok(())
    }

    /// List stored objects under `prefix`, newest first, one page at a time.
    ///
    /// The full listing is fetched from the provider (its transport-level
    /// pagination is walked internally), sorted by modification time
    /// descending, then sliced. Out-of-range pages yield an empty slice.
    /// Cost is O(total objects under prefix) per call.
    pub async fn list_files(
        &self,
        prefix: &str,
        page: usize,
        page_size: usize,
    ) -> BrokerResult<FileListing> {
        if page == 0 {
            return Err(BrokerError::validation("page numbers are 1-indexed"));
        }
        if page_size == 0 {
            return Err(BrokerError::validation("page size must be positive"));
        }

        let mut all_files = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let mut call = self
                .client
                .list_objects_v2()
                .bucket(&self.config.bucket_name)
                .prefix(prefix);
            if let Some(token) = &continuation {
                call = call.continuation_token(token);
            }

            let response = call
                .send()
                .await
                .map_err(|err| BrokerError::Upload(format!("{}", DisplayErrorContext(&err))))?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                all_files.push(FileInfo {
                    key: key.to_string(),
                    filename: filename_of(key).to_string(),
                    size: object.size().unwrap_or(0),
                    last_modified: object
                        .last_modified()
                        .map(to_chrono)
                        .unwrap_or(DateTime::UNIX_EPOCH),
                    etag: trim_etag(object.e_tag()),
                });
            }

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        debug!(prefix, total = all_files.len(), "listed objects");
        Ok(paginate(all_files, page, page_size))
    }

    /// Sign a download (read) URL for a stored object.
    ///
    /// `expires_in` overrides the configured expiry; bounds on an explicit
    /// override are delegated to the provider's signer.
    pub async fn download_url(&self, key: &str, expires_in: Option<u64>) -> BrokerResult<String> {
        let expires_in = expires_in.unwrap_or(self.config.presigned_url_expiry);
        let presigning = PresigningConfig::expires_in(StdDuration::from_secs(expires_in))
            .map_err(|err| BrokerError::Upload(format!("invalid presign expiry: {err}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.config.bucket_name)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| BrokerError::Upload(format!("{}", DisplayErrorContext(&err))))?;

        Ok(presigned.uri().to_string())
    }

    /// Delete a stored object.
    pub async fn delete_file(&self, key: &str) -> BrokerResult<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|err| BrokerError::Delete(format!("{}", DisplayErrorContext(&err))))?;

        info!(key, "deleted object");
        Ok(())
    }

    /// Abort every in-progress multipart upload older than `days_old` days.
    ///
    /// Walks the provider's upload listing marker by marker and aborts stale
    /// sessions one at a time, in listing order. The sweep races against
    /// concurrent completion by nature, so an individual abort failure is
    /// logged and skipped rather than failing the whole sweep; only
    /// successful aborts count toward the returned total.
    pub async fn cleanup_incomplete_uploads(&self, days_old: u32) -> BrokerResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(days_old));
        let mut aborted: u64 = 0;
        let mut skipped: u64 = 0;

        let mut key_marker: Option<String> = None;
        let mut upload_id_marker: Option<String> = None;
        loop {
            let mut call = self
                .client
                .list_multipart_uploads()
                .bucket(&self.config.bucket_name);
            if let Some(marker) = &key_marker {
                call = call.key_marker(marker);
            }
            if let Some(marker) = &upload_id_marker {
                call = call.upload_id_marker(marker);
            }

            let response = call
                .send()
                .await
                .map_err(|err| BrokerError::Upload(format!("{}", DisplayErrorContext(&err))))?;

            for upload in response.uploads() {
                let (Some(upload_id), Some(key)) = (upload.upload_id(), upload.key()) else {
                    continue;
                };
                let initiated = upload.initiated().map(to_chrono);
                if !is_stale(initiated, cutoff) {
                    continue;
                }

                match self.abort_upload(upload_id, key).await {
                    Ok(()) => aborted += 1,
                    Err(err) => {
                        // The upload may have completed since the listing.
                        warn!(upload_id, key, %err, "skipping upload that could not be aborted");
                        skipped += 1;
                    }
                }
            }

            if response.is_truncated().unwrap_or(false) {
                key_marker = response.next_key_marker().map(str::to_string);
                upload_id_marker = response.next_upload_id_marker().map(str::to_string);
                if key_marker.is_none() && upload_id_marker.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        info!(aborted, skipped, days_old, "cleanup sweep finished");
        Ok(aborted)
    }

    /// Check size bounds, the extension allow-list, and filename shape.
    /// Order-independent; all checks run before any provider call.
    fn validate_upload(&self, request: &UploadRequest) -> BrokerResult<()> {
        if request.filename.is_empty() {
            return Err(BrokerError::validation("filename cannot be empty"));
        }
        if request.file_size == 0 {
            return Err(BrokerError::validation("file size must be greater than zero"));
        }
        if request.file_size > self.config.max_file_size {
            return Err(BrokerError::validation(format!(
                "file size {} exceeds maximum allowed size {}",
                request.file_size, self.config.max_file_size
            )));
        }

        if let Some(allowed) = &self.config.allowed_extensions {
            let extension = extension_of(&request.filename);
            if !allowed.contains(&extension) {
                return Err(BrokerError::validation(format!(
                    "file extension .{extension} is not allowed"
                )));
            }
        }

        // The filename only feeds key construction when no custom key is given.
        if request.custom_key.is_none() {
            if request.filename.contains('/') || request.filename.contains('\\') {
                return Err(BrokerError::validation(
                    "filename cannot contain path separators",
                ));
            }
            if request.filename.len() > 1024 {
                return Err(BrokerError::validation("filename is too long"));
            }
        }

        Ok(())
    }
}

/// Number of parts a file of `file_size` splits into. Always at least 1 for
/// a positive size.
fn parts_count(file_size: u64, part_size: u64) -> u64 {
    file_size.div_ceil(part_size)
}

/// Build a date-organized key: `{prefix}/{yyyy}/{mm}/{dd}/{HHMMSS}_{filename}`.
/// Groups uploads chronologically and avoids collisions at second
/// granularity combined with the filename.
fn derive_key(prefix: &str, filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "{prefix}/{}/{}_{filename}",
        now.format("%Y/%m/%d"),
        now.format("%H%M%S")
    )
}

/// Lowercased substring after the last `.`; the whole name when there is no
/// dot, mirroring the allow-list contract.
fn extension_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_ascii_lowercase()
}

/// Last `/` segment of a key.
fn filename_of(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Strip the quotes providers wrap entity tags in.
fn trim_etag(etag: Option<&str>) -> Option<String> {
    etag.map(|tag| tag.trim_matches('"').to_string())
}

/// Convert a provider timestamp to `chrono`. Out-of-range values collapse
/// to the epoch rather than failing the listing.
fn to_chrono(timestamp: &aws_sdk_s3::primitives::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Validate and order a completion part list.
///
/// Rejects empty lists, duplicate part numbers, and numbers outside
/// `1..=10000`. With `strict` set, input must already be sorted ascending;
/// otherwise the list is sorted here before submission.
fn order_parts(parts: Vec<UploadPart>, strict: bool) -> BrokerResult<Vec<UploadPart>> {
    if parts.is_empty() {
        return Err(BrokerError::validation("parts list cannot be empty"));
    }

    let mut seen = HashSet::new();
    for part in &parts {
        if !(1..=MAX_PART_NUMBER).contains(&part.part_number) {
            return Err(BrokerError::validation(format!(
                "part number {} must be between 1 and {MAX_PART_NUMBER}",
                part.part_number
            )));
        }
        if !seen.insert(part.part_number) {
            return Err(BrokerError::validation(format!(
                "duplicate part number {}",
                part.part_number
            )));
        }
    }

    let sorted_already = parts
        .windows(2)
        .all(|pair| pair[0].part_number < pair[1].part_number);
    if strict && !sorted_already {
        return Err(BrokerError::validation(
            "parts must be sorted ascending by part number",
        ));
    }

    let mut parts = parts;
    parts.sort_by_key(|part| part.part_number);
    Ok(parts)
}

/// True when an upload initiated before `cutoff` should be swept. Uploads
/// with no reported timestamp are left alone.
fn is_stale(initiated: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    matches!(initiated, Some(timestamp) if timestamp < cutoff)
}

/// Sort newest-first and slice out the requested page.
fn paginate(mut files: Vec<FileInfo>, page: usize, page_size: usize) -> FileListing {
    files.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

    let total_count = files.len();
    let total_pages = total_count.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);
    let files: Vec<FileInfo> = files.into_iter().skip(start).take(page_size).collect();

    FileListing {
        files,
        total_count,
        page,
        page_size,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrokerConfig;
    use chrono::TimeZone;

    fn test_config() -> crate::config::BrokerConfigBuilder {
        BrokerConfig::builder("test-bucket", "AKIATEST", "test-secret")
    }

    fn test_service() -> UploadService {
        UploadService::new(test_config().build().unwrap())
    }

    fn file(key: &str, modified_secs: i64) -> FileInfo {
        FileInfo {
            key: key.to_string(),
            filename: filename_of(key).to_string(),
            size: 42,
            last_modified: Utc.timestamp_opt(modified_secs, 0).unwrap(),
            etag: None,
        }
    }

    #[test]
    fn parts_count_rounds_up() {
        let part = 5 * 1024 * 1024;
        assert_eq!(parts_count(1, part), 1);
        assert_eq!(parts_count(part, part), 1);
        assert_eq!(parts_count(part + 1, part), 2);
        assert_eq!(parts_count(10 * part, part), 10);
        assert_eq!(parts_count(10 * part + 1, part), 11);
    }

    #[test]
    fn derived_key_embeds_utc_date_and_filename() {
        let pinned = Utc.with_ymd_and_hms(2026, 3, 7, 14, 30, 5).unwrap();
        let key = derive_key("uploads", "report.pdf", pinned);
        assert_eq!(key, "uploads/2026/03/07/143005_report.pdf");
    }

    #[test]
    fn extension_is_lowercased_last_segment() {
        assert_eq!(extension_of("archive.tar.GZ"), "gz");
        assert_eq!(extension_of("photo.JPEG"), "jpeg");
        assert_eq!(extension_of("noext"), "noext");
    }

    #[test]
    fn filename_is_last_key_segment() {
        assert_eq!(filename_of("uploads/2026/03/07/143005_report.pdf"), "143005_report.pdf");
        assert_eq!(filename_of("flat-key"), "flat-key");
    }

    #[test]
    fn etag_quotes_are_stripped() {
        assert_eq!(trim_etag(Some("\"abc123\"")), Some("abc123".to_string()));
        assert_eq!(trim_etag(Some("abc123")), Some("abc123".to_string()));
        assert_eq!(trim_etag(None), None);
    }

    #[test]
    fn order_parts_sorts_lenient_input() {
        let parts = vec![UploadPart::new(2, "e2"), UploadPart::new(1, "e1")];
        let ordered = order_parts(parts, false).unwrap();
        assert_eq!(ordered, vec![UploadPart::new(1, "e1"), UploadPart::new(2, "e2")]);
    }

    #[test]
    fn order_parts_rejects_empty_list() {
        let err = order_parts(Vec::new(), false).unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[test]
    fn order_parts_rejects_duplicates() {
        let parts = vec![UploadPart::new(1, "e1"), UploadPart::new(1, "e1")];
        let err = order_parts(parts, false).unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[test]
    fn order_parts_rejects_out_of_range_numbers() {
        let err = order_parts(vec![UploadPart::new(0, "e")], false).unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
        let err = order_parts(vec![UploadPart::new(10_001, "e")], false).unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[test]
    fn strict_mode_rejects_unsorted_input() {
        let parts = vec![UploadPart::new(2, "e2"), UploadPart::new(1, "e1")];
        let err = order_parts(parts, true).unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[test]
    fn strict_mode_accepts_sorted_input() {
        let parts = vec![UploadPart::new(1, "e1"), UploadPart::new(2, "e2")];
        let ordered = order_parts(parts.clone(), true).unwrap();
        assert_eq!(ordered, parts);
    }

    #[test]
    fn pagination_slices_and_counts() {
        let files: Vec<FileInfo> = (0..5).map(|i| file(&format!("uploads/f{i}"), i)).collect();

        let first = paginate(files.clone(), 1, 2);
        assert_eq!(first.files.len(), 2);
        assert_eq!(first.total_count, 5);
        assert_eq!(first.total_pages, 3);

        let last = paginate(files.clone(), 3, 2);
        assert_eq!(last.files.len(), 1);

        let beyond = paginate(files, 4, 2);
        assert!(beyond.files.is_empty());
        assert_eq!(beyond.total_pages, 3);
    }

    #[test]
    fn pagination_orders_newest_first() {
        let files = vec![
            file("uploads/old", 100),
            file("uploads/newest", 300),
            file("uploads/mid", 200),
        ];
        let listing = paginate(files, 1, 10);
        let timestamps: Vec<_> = listing.files.iter().map(|f| f.last_modified).collect();
        assert!(timestamps.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(listing.files[0].key, "uploads/newest");
    }

    #[test]
    fn stale_cutoff_selects_only_older_uploads() {
        let cutoff = Utc.with_ymd_and_hms(2026, 1, 8, 0, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();

        assert!(is_stale(Some(older), cutoff));
        assert!(!is_stale(Some(newer), cutoff));
        assert!(!is_stale(Some(cutoff), cutoff));
        assert!(!is_stale(None, cutoff));
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_before_any_provider_call() {
        let service = UploadService::new(
            test_config().max_file_size(10 * 1024 * 1024).build().unwrap(),
        );
        let request = UploadRequest::new("big.bin", 11 * 1024 * 1024);
        let err = service.initiate_upload(request).await.unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_size_file_is_rejected() {
        let err = test_service()
            .initiate_upload(UploadRequest::new("empty.bin", 0))
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        let service = UploadService::new(
            test_config().allowed_extensions(["pdf", "jpg"]).build().unwrap(),
        );
        let err = service
            .initiate_upload(UploadRequest::new("malware.exe", 1024))
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[tokio::test]
    async fn path_separators_in_filename_are_rejected_for_derived_keys() {
        let service = test_service();
        for filename in ["../../etc/passwd", "dir\\file.txt"] {
            let err = service
                .initiate_upload(UploadRequest::new(filename, 1024))
                .await
                .unwrap_err();
            assert!(matches!(err, BrokerError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn part_number_bounds_are_enforced() {
        let service = test_service();
        for part_number in [0, -1, 10_001] {
            let err = service
                .presigned_part_url("upload-id", "uploads/key", part_number)
                .await
                .unwrap_err();
            assert!(matches!(err, BrokerError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn part_url_is_signed_locally_with_expiry() {
        // SigV4 presigning does not contact the network, so this runs with
        // dummy credentials.
        let service = test_service();
        let grant = service
            .presigned_part_url("upload-123", "uploads/2026/03/07/143005_report.pdf", 3)
            .await
            .unwrap();

        assert_eq!(grant.part_number, 3);
        assert_eq!(grant.expires_in, 3_600);
        assert!(grant.url.contains("partNumber=3"));
        assert!(grant.url.contains("143005_report.pdf"));
        assert!(grant.url.contains("X-Amz-Expires=3600"));
    }

    #[tokio::test]
    async fn download_url_is_signed_locally() {
        let service = test_service();
        let url = service
            .download_url("uploads/2026/03/07/143005_report.pdf", Some(120))
            .await
            .unwrap();
        assert!(url.contains("143005_report.pdf"));
        assert!(url.contains("X-Amz-Expires=120"));
    }

    #[tokio::test]
    async fn empty_parts_list_is_rejected() {
        let err = test_service()
            .complete_upload("upload-id", "uploads/key", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[tokio::test]
    async fn strict_service_rejects_unsorted_completion() {
        let service = UploadService::new(test_config().strict_part_order(true).build().unwrap());
        let parts = vec![UploadPart::new(2, "e2"), UploadPart::new(1, "e1")];
        let err = service
            .complete_upload("upload-id", "uploads/key", parts)
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::Validation(_)));
    }

    #[tokio::test]
    #[ignore] // Requires a live S3-compatible endpoint and credentials
    async fn round_trip_against_live_endpoint() {
        let config = BrokerConfig::builder(
            std::env::var("BROKER_BUCKET").unwrap(),
            std::env::var("AWS_ACCESS_KEY_ID").unwrap(),
            std::env::var("AWS_SECRET_ACCESS_KEY").unwrap(),
        )
        .endpoint_url(std::env::var("AWS_ENDPOINT_URL").unwrap())
        .build()
        .unwrap();
        let service = UploadService::new(config);

        let initiated = service
            .initiate_upload(UploadRequest::new("roundtrip.bin", 6 * 1024 * 1024))
            .await
            .unwrap();
        assert!(initiated.parts_count >= 1);

        for part_number in 1..=initiated.parts_count {
            let grant = service
                .presigned_part_url(&initiated.upload_id, &initiated.key, part_number as i32)
                .await
                .unwrap();
            assert!(!grant.url.is_empty());
        }

        // Nothing was uploaded through the URLs here, so completion would
        // fail; abort instead to leave the bucket clean.
        service
            .abort_upload(&initiated.upload_id, &initiated.key)
            .await
            .unwrap();
    }
}
