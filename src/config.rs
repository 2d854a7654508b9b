//! Broker configuration.
//!
//! Settings are collected through [`BrokerConfigBuilder`] and validated once
//! at build time; the resulting [`BrokerConfig`] is immutable for the
//! lifetime of the service. Validation failures surface as
//! [`BrokerError::Config`] before any provider client exists.

use crate::errors::{BrokerError, BrokerResult};
use std::collections::HashSet;

/// Provider-imposed floor for multipart part size (5 MiB).
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Default part size: the 5 MiB minimum.
pub const DEFAULT_PART_SIZE: u64 = MIN_PART_SIZE;

/// Presigned URLs must live at least one minute.
pub const MIN_URL_EXPIRY_SECS: u64 = 60;

/// Presigned URLs may live at most seven days.
pub const MAX_URL_EXPIRY_SECS: u64 = 604_800;

/// Default presigned URL lifetime: one hour.
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 3_600;

/// Default cap on the total object size (5 GiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Validated, immutable settings for the upload broker.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Target bucket for every operation.
    pub bucket_name: String,

    /// Static credential pair handed to the provider client.
    pub access_key_id: String,
    pub secret_access_key: String,

    /// Provider region (default: "us-east-1").
    pub region: String,

    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack, ...).
    pub endpoint_url: Option<String>,

    /// Force path-style addressing. Enabled automatically when a custom
    /// endpoint is configured.
    pub force_path_style: bool,

    /// Size of each upload part in bytes. Never below [`MIN_PART_SIZE`].
    pub part_size: u64,

    /// Lifetime of issued presigned URLs in seconds.
    pub presigned_url_expiry: u64,

    /// Maximum accepted total file size in bytes.
    pub max_file_size: u64,

    /// Lowercased extension allow-list. `None` means unrestricted.
    pub allowed_extensions: Option<HashSet<String>>,

    /// Completion ordering policy: when `true`, `complete_upload` rejects
    /// part lists that are not already sorted ascending by part number;
    /// when `false` (default) it sorts defensively before submission.
    pub strict_part_order: bool,
}

impl BrokerConfig {
    /// Start building a configuration from the required identity fields.
    pub fn builder(
        bucket_name: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> BrokerConfigBuilder {
        BrokerConfigBuilder {
            bucket_name: bucket_name.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: "us-east-1".into(),
            endpoint_url: None,
            force_path_style: false,
            part_size: DEFAULT_PART_SIZE,
            presigned_url_expiry: DEFAULT_URL_EXPIRY_SECS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: None,
            strict_part_order: false,
        }
    }
}

/// Builder for [`BrokerConfig`]. All optional fields start at their defaults.
#[derive(Debug, Clone)]
pub struct BrokerConfigBuilder {
    bucket_name: String,
    access_key_id: String,
    secret_access_key: String,
    region: String,
    endpoint_url: Option<String>,
    force_path_style: bool,
    part_size: u64,
    presigned_url_expiry: u64,
    max_file_size: u64,
    allowed_extensions: Option<Vec<String>>,
    strict_part_order: bool,
}

impl BrokerConfigBuilder {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn endpoint_url(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint.into());
        self
    }

    pub fn force_path_style(mut self, force: bool) -> Self {
        self.force_path_style = force;
        self
    }

    pub fn part_size(mut self, bytes: u64) -> Self {
        self.part_size = bytes;
        self
    }

    pub fn presigned_url_expiry(mut self, seconds: u64) -> Self {
        self.presigned_url_expiry = seconds;
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Restrict uploads to the given file extensions (leading dots and case
    /// are normalized away).
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn strict_part_order(mut self, strict: bool) -> Self {
        self.strict_part_order = strict;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Enforces:
    /// - non-empty bucket name and credentials
    /// - part size at or above the 5 MiB provider floor
    /// - URL expiry within 60s..=7d
    /// - positive maximum file size
    pub fn build(self) -> BrokerResult<BrokerConfig> {
        if self.bucket_name.trim().is_empty() {
            return Err(BrokerError::config("bucket name cannot be empty"));
        }
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(BrokerError::config("credentials cannot be empty"));
        }
        if self.part_size < MIN_PART_SIZE {
            return Err(BrokerError::config(format!(
                "part size {} is below the provider minimum of {} bytes",
                self.part_size, MIN_PART_SIZE
            )));
        }
        if !(MIN_URL_EXPIRY_SECS..=MAX_URL_EXPIRY_SECS).contains(&self.presigned_url_expiry) {
            return Err(BrokerError::config(format!(
                "presigned URL expiry {}s must be between {}s and {}s",
                self.presigned_url_expiry, MIN_URL_EXPIRY_SECS, MAX_URL_EXPIRY_SECS
            )));
        }
        if self.max_file_size == 0 {
            return Err(BrokerError::config("maximum file size must be positive"));
        }

        let allowed_extensions = self.allowed_extensions.map(|extensions| {
            extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect::<HashSet<_>>()
        });

        // Path-style addressing is required by most S3-compatible endpoints.
        let force_path_style = self.force_path_style || self.endpoint_url.is_some();

        Ok(BrokerConfig {
            bucket_name: self.bucket_name,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            region: self.region,
            endpoint_url: self.endpoint_url,
            force_path_style,
            part_size: self.part_size,
            presigned_url_expiry: self.presigned_url_expiry,
            max_file_size: self.max_file_size,
            allowed_extensions,
            strict_part_order: self.strict_part_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> BrokerConfigBuilder {
        BrokerConfig::builder("test-bucket", "AKIATEST", "secret")
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = base_builder().build().unwrap();
        assert_eq!(cfg.part_size, 5 * 1024 * 1024);
        assert_eq!(cfg.presigned_url_expiry, 3_600);
        assert_eq!(cfg.max_file_size, 5 * 1024 * 1024 * 1024);
        assert_eq!(cfg.region, "us-east-1");
        assert!(cfg.allowed_extensions.is_none());
        assert!(!cfg.strict_part_order);
        assert!(!cfg.force_path_style);
    }

    #[test]
    fn part_size_below_floor_is_rejected() {
        let err = base_builder().part_size(1024 * 1024).build().unwrap_err();
        assert!(matches!(err, BrokerError::Config(_)));
    }

    #[test]
    fn part_size_at_floor_is_accepted() {
        let cfg = base_builder().part_size(MIN_PART_SIZE).build().unwrap();
        assert_eq!(cfg.part_size, MIN_PART_SIZE);
    }

    #[test]
    fn expiry_out_of_bounds_is_rejected() {
        assert!(base_builder().presigned_url_expiry(59).build().is_err());
        assert!(base_builder().presigned_url_expiry(604_801).build().is_err());
        assert!(base_builder().presigned_url_expiry(60).build().is_ok());
        assert!(base_builder().presigned_url_expiry(604_800).build().is_ok());
    }

    #[test]
    fn zero_max_file_size_is_rejected() {
        let err = base_builder().max_file_size(0).build().unwrap_err();
        assert!(matches!(err, BrokerError::Config(_)));
    }

    #[test]
    fn empty_bucket_is_rejected() {
        let err = BrokerConfig::builder("  ", "key", "secret").build().unwrap_err();
        assert!(matches!(err, BrokerError::Config(_)));
    }

    #[test]
    fn extensions_are_normalized() {
        let cfg = base_builder()
            .allowed_extensions([".PDF", "Jpg", "png"])
            .build()
            .unwrap();
        let allowed = cfg.allowed_extensions.unwrap();
        assert!(allowed.contains("pdf"));
        assert!(allowed.contains("jpg"));
        assert!(allowed.contains("png"));
        assert_eq!(allowed.len(), 3);
    }

    #[test]
    fn custom_endpoint_forces_path_style() {
        let cfg = base_builder()
            .endpoint_url("http://localhost:9000")
            .build()
            .unwrap();
        assert!(cfg.force_path_style);
    }
}
