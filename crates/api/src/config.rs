use club_core::locator::DEFAULT_BUCKET;
use club_storage::S3Settings;

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
    /// Largest accepted upload body in bytes (default: 5 MiB).
    pub max_upload_bytes: usize,
    pub storage: StorageConfig,
}

/// Which attachment store backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files under a local directory, served by this process.
    Local,
    /// An S3-compatible object store.
    S3,
}

/// Attachment store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    /// Base URL that public locators are rendered against.
    pub public_base_url: String,
    /// Root directory for the local backend.
    pub local_root: String,
    pub s3: S3Settings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `5242880`                  |
    ///
    /// Storage settings are documented on [`StorageConfig::from_env`].
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

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            storage: StorageConfig::from_env(port),
        }
    }
}

impl StorageConfig {
    /// Load attachment store settings.
    ///
    /// | Env Var                   | Default                        |
    /// |---------------------------|--------------------------------|
    /// | `STORAGE_BACKEND`         | `local` (`local` or `s3`)      |
    /// | `STORAGE_BUCKET`          | `images`                       |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:{PORT}`      |
    /// | `STORAGE_LOCAL_ROOT`      | `./storage`                    |
    /// | `S3_ENDPOINT_URL`         | unset (AWS endpoints)          |
    /// | `S3_REGION`               | unset (AWS environment)        |
    pub fn from_env(port: u16) -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let optional = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            backend,
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.into()),
            public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            local_root: std::env::var("STORAGE_LOCAL_ROOT").unwrap_or_else(|_| "./storage".into()),
            s3: S3Settings {
                endpoint_url: optional("S3_ENDPOINT_URL"),
                region: optional("S3_REGION"),
            },
        }
    }
}
