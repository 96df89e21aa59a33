//! Chaos archive filename parser
//!
//! Dataset ids follow the Showdown naming convention
//! `gen<N><format>[<regulation>]-<elo>.json`, e.g. `gen9vgc2024regg-1760.json`.

use crate::types::{Generation, Mode, ParsedFormat, DEFAULT_REGULATION};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::FilenameParser;

/// Data-file extension of chaos datasets
const DATA_EXTENSION: &str = "json";

/// Stem of the archive metadata file
const META_STEM: &str = "meta";

/// Generation digit, format body, and the last hyphen-delimited numeric token.
/// Single-digit generations keep `gen91v1` decoding as gen9 + "1v1".
static STEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^gen(?P<gen>[1-9])(?P<body>[a-z0-9]+)-(?P<elo>0|[1-9][0-9]*)$")
        .expect("valid regex")
});

/// Regulation marker at the end of the format body: `regg`, `regulatione`,
/// `reggbo3` or `series2`
static REGULATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:reg(?:ulation)?[a-z](?:bo3)?|series[0-9]+)$").expect("valid regex")
});

/// Parser for Smogon chaos dataset filenames
#[derive(Debug, Default, Clone, Copy)]
pub struct ChaosFilenameParser;

impl ChaosFilenameParser {
    pub fn new() -> Self {
        Self
    }
}

impl FilenameParser for ChaosFilenameParser {
    fn name(&self) -> &str {
        "chaos"
    }

    fn parse(&self, filename: &str) -> Option<ParsedFormat> {
        let path = Path::new(filename.trim());
        if path.extension()?.to_str()? != DATA_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem == META_STEM {
            return None;
        }
        parse_stem(stem)
    }
}

/// Decode a dataset id (filename without extension)
pub fn parse_stem(stem: &str) -> Option<ParsedFormat> {
    let caps = STEM_RE.captures(stem)?;
    let generation = Generation(caps["gen"].parse().ok()?);
    let body = &caps["body"];
    let elo_bracket: u32 = caps["elo"].parse().ok()?;

    let (format_name, regulation) = match REGULATION_RE.find(body) {
        Some(m) if m.start() > 0 => (&body[..m.start()], m.as_str()),
        _ => (body, DEFAULT_REGULATION),
    };

    // Format label must carry at least one letter ("gen9-1500" is not a dataset)
    if !format_name.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(ParsedFormat {
        generation,
        mode: detect_mode(format_name),
        format_name: format_name.to_string(),
        regulation: regulation.to_string(),
        elo_bracket,
        dataset_id: stem.to_string(),
    })
}

/// Doubles when the label carries a doubles marker, singles otherwise
fn detect_mode(format_name: &str) -> Mode {
    if format_name.starts_with("vgc")
        || format_name.contains("doubles")
        || format_name.starts_with("2v2")
    {
        Mode::Doubles
    } else {
        Mode::Singles
    }
}
