use crate::config::CacheConfig;
use slovnik_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Where the tabular dataset comes from.
pub trait SourceFetcher {
    /// Human-readable source, recorded in metadata.
    fn source(&self) -> String;

    /// Fetch the full dataset as raw bytes.
    fn fetch(&self) -> Result<Vec<u8>>;
}

/// Downloads the dataset over HTTP(S)
pub struct HttpFetcher {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = CacheConfig::default();
        Self {
            url: url.into(),
            timeout: defaults.fetch_timeout,
            user_agent: defaults.user_agent,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl SourceFetcher for HttpFetcher {
    fn source(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        info!("Downloading dictionary from {}", self.url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| Error::Network(format!("Failed to download dictionary: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Failed to download dictionary: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::Network(format!("Failed to read dictionary data: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Reads the dataset from a local file
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SourceFetcher for FileFetcher {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        info!("Reading dictionary from {:?}", self.path);
        Ok(fs::read(&self.path)?)
    }
}

/// The fetcher matching `config.source`: HTTP for URLs, file otherwise.
pub fn fetcher_for(config: &CacheConfig) -> Box<dyn SourceFetcher> {
    if config.is_remote_source() {
        Box::new(
            HttpFetcher::new(&config.source)
                .with_timeout(config.fetch_timeout)
                .with_user_agent(&config.user_agent),
        )
    } else {
        Box::new(FileFetcher::new(&config.source))
    }
}
