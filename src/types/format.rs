//! Dataset identifier and format index types

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Regulation assigned to formats whose identifier carries no regulation marker
pub const DEFAULT_REGULATION: &str = "standard";

/// Game generation, ordered numerically and serialized as `gen<N>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u8);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

impl FromStr for Generation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.strip_prefix("gen")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| *n > 0)
            .map(Generation)
            .ok_or_else(|| format!("invalid generation '{}'", s))
    }
}

impl Serialize for Generation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Generation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Battle mode of a format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Singles,
    Doubles,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Singles => "singles",
            Mode::Doubles => "doubles",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured metadata decoded from one chaos archive filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFormat {
    pub generation: Generation,
    pub mode: Mode,
    /// Format label without generation and regulation (e.g. "vgc2024", "ou")
    pub format_name: String,
    /// Regulation marker (e.g. "regg"), or [`DEFAULT_REGULATION`]
    pub regulation: String,
    /// Minimum rating cutoff of the dataset
    pub elo_bracket: u32,
    /// Filename stem, used to fetch the payload (e.g. "gen9vgc2024regg-1760")
    pub dataset_id: String,
}

impl ParsedFormat {
    /// Rebuild the dataset key from the decoded parts.
    ///
    /// For every identifier accepted by the parser this equals `dataset_id`.
    pub fn dataset_key(&self) -> String {
        let regulation = if self.regulation == DEFAULT_REGULATION {
            ""
        } else {
            self.regulation.as_str()
        };
        format!(
            "{}{}{}-{}",
            self.generation, self.format_name, regulation, self.elo_bracket
        )
    }
}

/// One rating bracket leaf of the format tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EloDataset {
    pub elo_bracket: u32,
    pub dataset_id: String,
}

pub type RegulationMap = BTreeMap<String, Vec<EloDataset>>;
pub type FormatMap = BTreeMap<String, RegulationMap>;
pub type ModeMap = BTreeMap<Mode, FormatMap>;

/// Navigable generation → mode → format → regulation → brackets index.
///
/// Bracket lists are sorted by descending rating. Built wholesale, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatTree(pub(crate) BTreeMap<Generation, ModeMap>);

impl FormatTree {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn generations(&self) -> impl Iterator<Item = (&Generation, &ModeMap)> {
        self.0.iter()
    }

    pub fn get(&self, generation: Generation) -> Option<&ModeMap> {
        self.0.get(&generation)
    }

    /// Rating brackets for one regulation, highest first
    pub fn brackets(
        &self,
        generation: Generation,
        mode: Mode,
        format_name: &str,
        regulation: &str,
    ) -> Option<&[EloDataset]> {
        self.0
            .get(&generation)?
            .get(&mode)?
            .get(format_name)?
            .get(regulation)
            .map(Vec::as_slice)
    }

    /// Total number of datasets across all leaves
    pub fn dataset_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|modes| modes.values())
            .flat_map(|formats| formats.values())
            .flat_map(|regs| regs.values())
            .map(Vec::len)
            .sum()
    }
}

/// Served index response: dataset date plus the format tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatIndex {
    pub date: Option<String>,
    pub structure: FormatTree,
}
