//! The storage provider trait and its error type.

use async_trait::async_trait;

/// Errors from a storage provider.
///
/// `NotFound` and `Upload` are kept distinct so callers can tell "the
/// source object is missing" apart from "generation succeeded but
/// persistence failed".
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested object does not exist.
    #[error("Object not found: {key}")]
    NotFound { key: String },

    /// Writing the object failed.
    #[error("Upload failed for {key}: {message}")]
    Upload { key: String, message: String },

    /// Reading an existing object failed partway.
    #[error("Read failed for {key}: {message}")]
    Read { key: String, message: String },
}

/// A durable blob store addressed by object key.
///
/// Keys are opaque relative paths (e.g. `responses/0192f-….png`). `url_for`
/// maps a key to the public URL the browser loads; `key_for` inverts it for
/// URLs this provider issued.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Persist `bytes` under `key`, returning the public URL.
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError>;

    /// Fetch the object stored under `key`.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// The public URL for an object key.
    fn url_for(&self, key: &str) -> String;

    /// The object key behind a public URL, if this provider issued it.
    fn key_for<'a>(&self, url: &'a str) -> Option<&'a str>;
}
