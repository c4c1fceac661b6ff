//! Process configuration, read once at startup from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.discogs.com";
pub const DEFAULT_DELAY_SEC: f64 = 0.25;
pub const DEFAULT_TIMEOUT_SEC: f64 = 15.0;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Settings for talking to the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub user_agent: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Politeness delay between calls in batch jobs
    pub delay: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: None,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SEC),
            delay: Duration::from_secs_f64(DEFAULT_DELAY_SEC),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Paths {
    pub collection: PathBuf,
    pub images_dir: PathBuf,
    pub static_dir: PathBuf,
    pub bin_store: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            collection: PathBuf::from("collection.json"),
            images_dir: PathBuf::from("images"),
            static_dir: PathBuf::from("static"),
            bin_store: PathBuf::from("bins.json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub paths: Paths,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            paths: Paths::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        let catalog = CatalogConfig {
            api_base: get("DISCOGS_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.catalog.api_base),
            token: get("DISCOGS_TOKEN"),
            user_agent: get("DISCOGS_UA"),
            timeout: seconds(get("DISCOGS_TIMEOUT_SEC"), "DISCOGS_TIMEOUT_SEC")
                .unwrap_or(defaults.catalog.timeout),
            delay: seconds(get("DISCOGS_DELAY_SEC"), "DISCOGS_DELAY_SEC")
                .unwrap_or(defaults.catalog.delay),
        };

        let paths = Paths {
            collection: get("COLLECTION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.collection),
            images_dir: get("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.images_dir),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.static_dir),
            bin_store: get("BIN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.bin_store),
        };

        Self {
            catalog,
            paths,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }

    /// Missing credentials only degrade upstream access, so they are
    /// reported here instead of failing startup.
    pub fn warn_missing_credentials(&self) {
        if self.catalog.token.is_none() {
            tracing::warn!("DISCOGS_TOKEN is not set; requests may be throttled or blocked");
        }
        if self.catalog.user_agent.is_none() {
            tracing::warn!("DISCOGS_UA is not set; set a proper User-Agent per Discogs policy");
        }
    }
}

fn seconds(raw: Option<String>, key: &str) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}
