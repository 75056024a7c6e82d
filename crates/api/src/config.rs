use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Image-edit provider settings.
    pub generation: GenerationConfig,
    /// Blob storage settings.
    pub storage: StorageConfig,
}

/// Settings for the external image-edit provider.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL of the provider API.
    pub api_url: String,
    /// Bearer token for the provider account.
    pub api_key: String,
    /// Whole-request timeout for provider calls in seconds (default: `60`).
    pub timeout_secs: u64,
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the blob storage provider.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// `local` or `s3` (default: `local`).
    pub mode: StorageMode,
    /// Directory generated images are written under in local mode.
    pub local_root: String,
    /// Bucket name in s3 mode.
    pub s3_bucket: String,
    /// URL prefix the browser loads stored objects from.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Local,
    S3,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `HOST`                    | `0.0.0.0`                        |
    /// | `PORT`                    | `3000`                           |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                             |
    /// | `GENERATION_API_URL`      | `http://localhost:8300`          |
    /// | `GENERATION_API_KEY`      | (empty)                          |
    /// | `GENERATION_TIMEOUT_SECS` | `60`                             |
    /// | `STORAGE_MODE`            | `local`                          |
    /// | `STORAGE_LOCAL_ROOT`      | `./media`                        |
    /// | `STORAGE_S3_BUCKET`       | (empty)                          |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:3000/media`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let generation = GenerationConfig {
            api_url: std::env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| "http://localhost:8300".into()),
            api_key: std::env::var("GENERATION_API_KEY").unwrap_or_default(),
            timeout_secs: std::env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("GENERATION_TIMEOUT_SECS must be a valid u64"),
        };

        let mode = match std::env::var("STORAGE_MODE")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => StorageMode::Local,
            "s3" => StorageMode::S3,
            other => panic!("STORAGE_MODE must be 'local' or 's3', got '{other}'"),
        };

        let storage = StorageConfig {
            mode,
            local_root: std::env::var("STORAGE_LOCAL_ROOT").unwrap_or_else(|_| "./media".into()),
            s3_bucket: std::env::var("STORAGE_S3_BUCKET").unwrap_or_default(),
            public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/media".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            generation,
            storage,
        }
    }
}
