//! Parsers for chaos archive listings, payloads and metadata

mod chaos_filename;
mod chaos_payload;
mod meta;

pub use chaos_filename::{parse_stem, ChaosFilenameParser};
pub use chaos_payload::{decode_payload, load_payload};
pub use meta::{load_meta, parse_meta, DatasetMeta, META_FILENAME};

use crate::types::ParsedFormat;
use rayon::prelude::*;
use std::path::Path;

/// Trait for decoding dataset identifiers from archive filenames.
///
/// The naming convention of the upstream host lives behind this seam only.
pub trait FilenameParser: Send + Sync {
    /// Parser name (e.g., "chaos")
    #[allow(dead_code)] // Part of trait API, used in tests
    fn name(&self) -> &str;

    /// Decode one filename; `None` for names that are not datasets
    fn parse(&self, filename: &str) -> Option<ParsedFormat>;

    /// Parse a whole listing in parallel, skipping non-dataset names.
    /// Output keeps listing order.
    fn parse_listing<S: AsRef<str> + Sync>(&self, names: &[S]) -> Vec<ParsedFormat>
    where
        Self: Sized,
    {
        names
            .par_iter()
            .filter_map(|name| self.parse(name.as_ref()))
            .collect()
    }
}

/// Glob pattern matching candidate dataset files in an archive directory
pub const LISTING_PATTERN: &str = "*.json";

/// Collect file names (not paths) of an archive directory, sorted by name
pub fn collect_listing(dir: &Path) -> Vec<String> {
    let pattern = dir.join(LISTING_PATTERN);
    let mut names: Vec<String> = glob::glob(&pattern.to_string_lossy())
        .map(|paths| {
            paths
                .filter_map(|e| e.ok())
                .filter(|p| p.is_file())
                .filter_map(|p| file_name(&p))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
}
