//! Receipt Storage Library
//!
//! Storage abstraction for receipt images, with S3 and local filesystem
//! implementations.
//!
//! # Storage key format
//!
//! Every backend uses the same layout, partitioned by upload month (UTC):
//!
//! `receipts/{YYYY}/{MM}/{uuid}{.ext}`
//!
//! The extension is taken from the uploader's filename and reduced to lower-case
//! ASCII alphanumerics. Keys never contain `..` or a leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use receipt_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
