//! Presigned multipart upload broker for S3-compatible object storage.
//!
//! Lets a backend hand out direct-to-storage upload URLs instead of proxying
//! file bytes through its own process: initiate a multipart upload, issue a
//! presigned URL per part, then complete or abort the session. Listing,
//! download-URL issuance, deletion, and stale-upload cleanup round out the
//! surface. All durability and consistency guarantees are delegated to the
//! provider through `aws-sdk-s3`; this crate holds no upload state of its own.
//!
//! ```no_run
//! use multipart_broker::{BrokerConfig, UploadRequest, UploadService};
//!
//! # async fn example() -> multipart_broker::BrokerResult<()> {
//! let config = BrokerConfig::builder("my-bucket", "access-key", "secret-key")
//!     .region("eu-west-1")
//!     .allowed_extensions(["pdf", "zip"])
//!     .build()?;
//! let service = UploadService::new(config);
//!
//! let upload = service
//!     .initiate_upload(UploadRequest::new("large-file.pdf", 104_857_600))
//!     .await?;
//! let first_part = service
//!     .presigned_part_url(&upload.upload_id, &upload.key, 1)
//!     .await?;
//! # let _ = first_part;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::BrokerConfig;
pub use errors::{BrokerError, BrokerResult};
pub use models::{
    CompletedUpload, FileInfo, FileListing, InitiatedUpload, PresignedPartUrl, UploadPart,
    UploadRequest,
};
pub use services::UploadService;
