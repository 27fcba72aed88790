use slovnik_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public CSV export of the Interslavic cross-language dictionary sheet.
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/1N79e_yVHDo-d026HljueuKJlAAdeELAiPzdFzdBuKbY/export?format=csv&gid=1987833874";

const STORE_DIR: &str = "dictionary";
const METADATA_FILE: &str = "metadata.json";

/// Where the cache lives and how it is filled.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_dir: PathBuf,
    /// URL or local path of the tabular source
    pub source: String,
    /// LMDB map size in bytes
    pub map_size: usize,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            source: DEFAULT_SOURCE_URL.to_string(),
            map_size: 1024 * 1024 * 1024, // 1GB
            fetch_timeout: Duration::from_secs(30),
            user_agent: format!("slovnik/{} (Interslavic dictionary tool)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CacheConfig {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_map_size(mut self, map_size: usize) -> Self {
        self.map_size = map_size;
        self
    }

    #[inline]
    pub fn store_path(&self) -> PathBuf {
        self.cache_dir.join(STORE_DIR)
    }

    #[inline]
    pub fn metadata_path(&self) -> PathBuf {
        self.cache_dir.join(METADATA_FILE)
    }

    /// Whether the source should be fetched over HTTP rather than read
    /// from disk.
    pub fn is_remote_source(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(Error::InvalidConfig("source must not be empty".to_string()));
        }
        if self.map_size == 0 || self.map_size % 4096 != 0 {
            return Err(Error::InvalidConfig(format!(
                "map size {} must be a non-zero multiple of 4096",
                self.map_size
            )));
        }
        if self.fetch_timeout.is_zero() {
            return Err(Error::InvalidConfig("fetch timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// `$HOME/.cache/interslavic`, or `./.cache/interslavic` without a home.
pub fn default_cache_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cache")
        .join("interslavic")
}
