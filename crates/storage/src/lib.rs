//! Blob storage providers for generated images.
//!
//! The API server stores generated image bytes through the
//! [`StorageProvider`] trait and serves them by public URL. Two providers
//! ship: local filesystem (development) and S3 (hosted deployments).

pub mod local;
pub mod provider;
pub mod s3;

pub use local::LocalStorage;
pub use provider::{StorageError, StorageProvider};
pub use s3::S3Storage;
