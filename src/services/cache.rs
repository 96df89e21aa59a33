//! Cache collaborators for archive indexes and decoded payloads
//!
//! Both caches are owned by the caller and injected into the loader; the core
//! transforms never touch them.

use crate::types::{CacheWarning, ChaosError, FormatIndex, RawUsageStats, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Request coordinates of one decoded payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    /// Dataset month, when the archive has one
    pub date: Option<String>,
    pub dataset_id: String,
}

/// Cache of decoded payloads keyed by request coordinates
pub trait PayloadCache: Send + Sync {
    fn get(&self, key: &DatasetKey) -> Option<Arc<RawUsageStats>>;
    fn put(&self, key: DatasetKey, payload: Arc<RawUsageStats>);
}

/// In-process payload cache, safe to share between concurrent requests
#[derive(Default)]
pub struct MemoryPayloadCache {
    entries: RwLock<HashMap<DatasetKey, Arc<RawUsageStats>>>,
}

impl MemoryPayloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PayloadCache for MemoryPayloadCache {
    fn get(&self, key: &DatasetKey) -> Option<Arc<RawUsageStats>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn put(&self, key: DatasetKey, payload: Arc<RawUsageStats>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, payload);
        }
    }
}

/// On-disk index cache document
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexCache {
    pub source: String,
    pub updated_at: i64,
    /// Directory listing the index was built from
    pub listing: Vec<String>,
    pub index: FormatIndex,
}

/// Persistent cache of served format indexes, one file per archive directory.
///
/// An entry is reused only while the listing and dataset date are unchanged;
/// otherwise the index is rebuilt wholesale.
pub struct IndexCacheService {
    cache_dir: PathBuf,
}

impl IndexCacheService {
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_path(&self, source: &str) -> PathBuf {
        let name: String = source
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("{}_index.json", name))
    }

    /// Return the cached index for `source` if it was built from the same listing and
    /// date, otherwise build it with `compute` and store it.
    pub fn load_or_compute<F>(
        &self,
        source: &str,
        listing: &[String],
        date: Option<&str>,
        compute: F,
    ) -> Result<(FormatIndex, Option<CacheWarning>)>
    where
        F: FnOnce() -> FormatIndex,
    {
        let (cached, warning) = self.load_cache(source);
        if let Some(cache) = cached {
            if cache.listing == listing && cache.index.date.as_deref() == date {
                return Ok((cache.index, warning));
            }
        }

        let index = compute();
        self.save_cache(source, listing, &index)?;
        Ok((index, warning))
    }

    /// Load the cache document under a shared lock
    fn load_cache(&self, source: &str) -> (Option<IndexCache>, Option<CacheWarning>) {
        let path = self.cache_path(source);
        if !path.exists() {
            return (None, None);
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                return (
                    None,
                    Some(CacheWarning::LoadFailed(format!(
                        "Failed to open cache: {}",
                        e
                    ))),
                );
            }
        };

        if let Err(e) = file.lock_shared() {
            return (
                None,
                Some(CacheWarning::LoadFailed(format!(
                    "Failed to acquire read lock: {}",
                    e
                ))),
            );
        }

        let mut content = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read = reader.read_to_string(&mut content);
        let _ = file.unlock();

        if let Err(e) = read {
            return (
                None,
                Some(CacheWarning::LoadFailed(format!(
                    "Failed to read cache: {}",
                    e
                ))),
            );
        }

        match serde_json::from_str::<IndexCache>(&content) {
            Ok(cache) if cache.source == source => (Some(cache), None),
            // Sanitized names collided; treat as a miss
            Ok(_) => (None, None),
            Err(e) => (
                None,
                Some(CacheWarning::Corrupted(format!(
                    "Corrupted cache file: {}",
                    e
                ))),
            ),
        }
    }

    /// Save using atomic write (temp file + rename) with exclusive lock.
    fn save_cache(&self, source: &str, listing: &[String], index: &FormatIndex) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let cache = IndexCache {
            source: source.to_string(),
            updated_at: chrono::Utc::now().timestamp(),
            listing: listing.to_vec(),
            index: index.clone(),
        };

        let content = serde_json::to_string_pretty(&cache)
            .map_err(|e| ChaosError::Cache(format!("Serialization failed: {}", e)))?;

        let path = self.cache_path(source);
        let temp_path = path.with_extension("json.tmp");

        {
            let mut file = File::create(&temp_path)
                .map_err(|e| ChaosError::Cache(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| ChaosError::Cache(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| ChaosError::Cache(format!("Failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        target
            .lock_exclusive()
            .map_err(|e| ChaosError::Cache(format!("Failed to acquire write lock: {}", e)))?;

        fs::rename(&temp_path, &path)
            .map_err(|e| ChaosError::Cache(format!("Failed to rename temp file: {}", e)))?;

        let _ = target.unlock();
        Ok(())
    }
}
