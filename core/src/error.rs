//! Error types shared by the cache layer.
//!
//! Local failures (disk, malformed collection document) use [`Error`] and are
//! fatal for the single operation that hit them. Failures talking to the
//! catalog API use [`UpstreamError`]; callers recover from those locally.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// Local error. `Clone` so one failed resolution can be handed to every
/// caller waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),

    #[error("invalid collection document: {0}")]
    Collection(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}

/// Soft failure from the catalog API. Means "no additional data", never
/// fatal for the caller.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("rate limited by {url}")]
    RateLimited {
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("malformed payload from {url}: {message}")]
    Decode { url: String, message: String },
}
