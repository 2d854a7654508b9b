//! Value objects exchanged with callers of the broker.
//!
//! Nothing here is persisted by this crate; every type is a transient
//! request or response shape, serialized naturally as JSON via `serde`.
//! The provider remains the only source of truth for upload state.

pub mod object;
pub mod upload;

pub use object::{FileInfo, FileListing};
pub use upload::{CompletedUpload, InitiatedUpload, PresignedPartUrl, UploadPart, UploadRequest};
