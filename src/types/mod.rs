//! Type definitions for chaosdex

mod error;
mod format;
mod usage;

pub use error::*;
pub use format::*;
pub use usage::*;

/// Cache loading warning types
#[derive(Debug, Clone, PartialEq)]
pub enum CacheWarning {
    /// Failed to open or read cache file
    LoadFailed(String),
    /// Cache file was corrupted (invalid JSON)
    Corrupted(String),
}

impl std::fmt::Display for CacheWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheWarning::LoadFailed(msg) | CacheWarning::Corrupted(msg) => f.write_str(msg),
        }
    }
}
