use std::sync::Arc;

use omm_generation::ImageEditApi;
use omm_storage::StorageProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: omm_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob storage for generated images.
    pub storage: Arc<dyn StorageProvider>,
    /// Client for the external image-edit provider.
    pub generator: Arc<ImageEditApi>,
    /// Plain HTTP client for fetching external source images (street-view
    /// URLs the map layer recorded).
    pub http: reqwest::Client,
}
