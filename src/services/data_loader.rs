//! Archive loading service for the index and summary responses
//!
//! Reads a local archive directory (one month of chaos datasets plus
//! `meta.json`), runs the pure transforms, and owns the cache collaborators.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::config::ChaosConfig;
use crate::parsers::{
    collect_listing, load_meta, load_payload, parse_stem, ChaosFilenameParser, FilenameParser,
};
use crate::services::cache::{DatasetKey, IndexCacheService, MemoryPayloadCache, PayloadCache};
use crate::services::{FormatTreeBuilder, UsageStatNormalizer};
use crate::types::{
    CacheWarning, ChaosError, FormatIndex, NormalizedUsageSummary, RawUsageStats, Result,
};

/// Result of loading the format index of an archive directory
#[derive(Debug)]
pub struct IndexLoadResult {
    pub index: FormatIndex,
    /// Cache warning indicator (if any)
    pub cache_warning: Option<CacheWarning>,
}

/// Archive loading service
pub struct DataLoaderService {
    config: ChaosConfig,
    parser: ChaosFilenameParser,
    index_cache: Option<IndexCacheService>,
    payloads: Arc<dyn PayloadCache>,
    /// Dataset month, read from `meta.json` on first use
    date: OnceLock<Option<String>>,
}

impl DataLoaderService {
    /// Create a loader with an in-memory payload cache and, when configured,
    /// the on-disk index cache
    pub fn new(config: ChaosConfig) -> Result<Self> {
        config.validate()?;
        let index_cache = config
            .cache_dir
            .clone()
            .map(IndexCacheService::with_cache_dir);
        Ok(Self {
            config,
            parser: ChaosFilenameParser::new(),
            index_cache,
            payloads: Arc::new(MemoryPayloadCache::new()),
            date: OnceLock::new(),
        })
    }

    /// Replace the payload cache (e.g. one shared between several loaders)
    pub fn with_payload_cache(mut self, payloads: Arc<dyn PayloadCache>) -> Self {
        self.payloads = payloads;
        self
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    /// Dataset month from `meta.json`, resolved once per loader.
    /// Missing or invalid meta is a warning, not an error.
    pub fn dataset_date(&self) -> Option<String> {
        self.date
            .get_or_init(|| match load_meta(&self.config.archive_dir) {
                Ok(meta) => Some(meta.date),
                Err(e) => {
                    eprintln!(
                        "[chaosdex] Warning: No dataset date for {}: {}",
                        self.config.archive_dir.display(),
                        e
                    );
                    None
                }
            })
            .clone()
    }

    /// Build (or reuse) the served index for the archive directory
    pub fn load_index(&self) -> Result<IndexLoadResult> {
        let listing = collect_listing(&self.config.archive_dir);
        let date = self.dataset_date();

        let Some(cache) = &self.index_cache else {
            return Ok(IndexLoadResult {
                index: self.build_index(&listing, date),
                cache_warning: None,
            });
        };

        let source = self.source_id();
        match cache.load_or_compute(&source, &listing, date.as_deref(), || {
            self.build_index(&listing, date.clone())
        }) {
            Ok((index, cache_warning)) => Ok(IndexLoadResult {
                index,
                cache_warning,
            }),
            Err(e) => {
                // Cache trouble never blocks serving the index
                eprintln!("[chaosdex] Warning: Index cache unavailable: {}", e);
                Ok(IndexLoadResult {
                    index: self.build_index(&listing, date),
                    cache_warning: None,
                })
            }
        }
    }

    fn build_index(&self, listing: &[String], date: Option<String>) -> FormatIndex {
        FormatIndex {
            date,
            structure: FormatTreeBuilder::build(&self.parser.parse_listing(listing)),
        }
    }

    /// Decoded payload for `dataset_id`, through the payload cache
    pub fn load_raw(&self, dataset_id: &str) -> Result<Arc<RawUsageStats>> {
        if parse_stem(dataset_id).is_none() {
            return Err(ChaosError::Config(format!(
                "'{}' is not a chaos dataset id",
                dataset_id
            )));
        }

        let date = self.dataset_date();
        let key = DatasetKey {
            date: date.clone(),
            dataset_id: dataset_id.to_string(),
        };
        if let Some(raw) = self.payloads.get(&key) {
            return Ok(raw);
        }

        let mut raw = load_payload(&self.payload_path(dataset_id))?;
        raw.date = date;
        let raw = Arc::new(raw);
        self.payloads.put(key, Arc::clone(&raw));
        Ok(raw)
    }

    /// Competitive summary for one Pokémon; `Ok(None)` when it has no data
    pub fn load_summary(
        &self,
        dataset_id: &str,
        pokemon: &str,
    ) -> Result<Option<NormalizedUsageSummary>> {
        let raw = self.load_raw(dataset_id)?;
        UsageStatNormalizer::new(self.config.top_n).normalize(&raw, pokemon)
    }

    fn payload_path(&self, dataset_id: &str) -> PathBuf {
        self.config.archive_dir.join(format!("{}.json", dataset_id))
    }

    /// Stable identifier of the archive directory for the index cache
    fn source_id(&self) -> String {
        self.config
            .archive_dir
            .canonicalize()
            .unwrap_or_else(|_| self.config.archive_dir.clone())
            .to_string_lossy()
            .into_owned()
    }
}
