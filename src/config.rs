//! Runtime configuration

use crate::services::usage_stats::DEFAULT_TOP_N;
use crate::types::{ChaosError, Result};
use directories::BaseDirs;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosConfig {
    /// Directory holding one month of chaos datasets plus `meta.json`
    pub archive_dir: PathBuf,
    /// Index cache location; `None` disables the on-disk cache
    pub cache_dir: Option<PathBuf>,
    /// Length of every top-N list in summaries
    pub top_n: usize,
}

impl ChaosConfig {
    /// Defaults: current directory as archive, `~/.chaosdex/cache` as cache
    pub fn new() -> Self {
        Self {
            archive_dir: PathBuf::from("."),
            cache_dir: default_cache_dir(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_archive_dir(mut self, dir: PathBuf) -> Self {
        self.archive_dir = dir;
        self
    }

    pub fn with_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cache_dir = dir;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Reject configurations no request could succeed with
    pub fn validate(&self) -> Result<()> {
        if !self.archive_dir.is_dir() {
            return Err(ChaosError::Config(format!(
                "archive directory '{}' does not exist",
                self.archive_dir.display()
            )));
        }
        if self.top_n == 0 {
            return Err(ChaosError::Config("top-N must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_cache_dir() -> Option<PathBuf> {
    match BaseDirs::new() {
        Some(dirs) => Some(dirs.home_dir().join(".chaosdex").join("cache")),
        None => {
            let message = "Could not determine home directory, index cache disabled";
            eprintln!("[chaosdex] Warning: {}", message);
            None
        }
    }
}
