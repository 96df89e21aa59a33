//! `meta.json` decoder (dataset date of an archive directory)

use crate::types::{ChaosError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Filename of the archive metadata document
pub const META_FILENAME: &str = "meta.json";

#[derive(Deserialize)]
struct MetaDocument {
    date: String,
}

/// Dataset date, normalized to month precision (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMeta {
    pub date: String,
}

/// Decode a `meta.json` document. Accepts `YYYY-MM` and `YYYY-MM-DD`.
pub fn parse_meta(bytes: &mut [u8]) -> Result<DatasetMeta> {
    let doc: MetaDocument =
        simd_json::from_slice(bytes).map_err(|e| ChaosError::Parse(e.to_string()))?;
    let date = normalize_month(&doc.date)
        .ok_or_else(|| ChaosError::Parse(format!("invalid dataset date '{}'", doc.date)))?;
    Ok(DatasetMeta { date })
}

/// Read `meta.json` from an archive directory
pub fn load_meta(dir: &Path) -> Result<DatasetMeta> {
    let mut bytes = fs::read(dir.join(META_FILENAME))?;
    parse_meta(&mut bytes)
}

fn normalize_month(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%Y-%m").to_string())
}
