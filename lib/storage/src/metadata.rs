use atomicwrites::{AllowOverwrite, AtomicFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slovnik_core::{Error, Result, SCHEMA_VERSION};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn legacy_schema_version() -> u32 {
    1
}

/// Sidecar record of the last successful load.
///
/// Files written before versioning was introduced have no
/// `schema_version` and read as version 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheMetadata {
    pub last_load: DateTime<Utc>,
    pub source: String,
    pub row_count: u64,
    pub columns: Vec<String>,
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
}

impl CacheMetadata {
    /// Record for a load that just finished.
    pub fn new(source: impl Into<String>, row_count: u64, columns: Vec<String>) -> Self {
        Self {
            last_load: Utc::now(),
            source: source.into(),
            row_count,
            columns,
            schema_version: SCHEMA_VERSION,
        }
    }

    #[inline]
    pub fn needs_upgrade(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }
}

/// The metadata file on disk.
#[derive(Debug, Clone)]
pub struct MetadataFile {
    path: PathBuf,
}

impl MetadataFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// `None` when the file does not exist.
    pub fn read(&self) -> Result<Option<CacheMetadata>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let metadata = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Metadata(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(metadata))
    }

    /// Replace the file in one step; readers see the old or the new record.
    pub fn write(&self, metadata: &CacheMetadata) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(metadata)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        AtomicFile::new(&self.path, AllowOverwrite)
            .write(|f| f.write_all(&json))
            .map_err(|e| Error::Metadata(format!("{}: {}", self.path.display(), e)))
    }

    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
