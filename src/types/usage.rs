//! Usage statistics types: raw chaos payloads and normalized summaries

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Counter map as found in a chaos payload (name → weighted count)
pub type Counters = HashMap<String, f64>;

/// Decoded chaos payload for one (format, date, rating bracket) dataset.
/// Read-only input to the usage normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawUsageStats {
    /// Showdown format id the payload describes (e.g. "gen9vgc2024regg")
    pub metagame: String,
    /// Rating cutoff the payload was generated with
    pub cutoff: Option<u32>,
    /// Dataset month, merged in from `meta.json` by the loader
    pub date: Option<String>,
    pub total_battles: u64,
    /// Keyed by display name (e.g. "Flutter Mane")
    pub per_pokemon: HashMap<String, RawPokemonStats>,
}

/// Per-Pokémon counters of a chaos payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPokemonStats {
    /// Usage weight (number of team appearances)
    pub raw_count: u64,
    pub moves: Counters,
    pub abilities: Counters,
    pub items: Counters,
    pub teammates: Counters,
    /// Keyed by `Nature:HP/Atk/Def/SpA/SpD/Spe`
    pub spreads: Counters,
    pub viability_ceiling: Option<Vec<u64>>,
}

/// Six-stat EV allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EvAllocation {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

impl FromStr for EvAllocation {
    type Err = String;

    /// Parse `HP/Atk/Def/SpA/SpD/Spe`, e.g. "4/0/0/252/0/252"
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let values: Vec<u16> = s
            .split('/')
            .map(|part| part.trim().parse::<u16>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| format!("invalid EV value in '{}': {}", s, e))?;

        match values.as_slice() {
            &[hp, atk, def, spa, spd, spe] => Ok(Self {
                hp,
                atk,
                def,
                spa,
                spd,
                spe,
            }),
            _ => Err(format!(
                "expected 6 EV values in '{}', got {}",
                s,
                values.len()
            )),
        }
    }
}

impl fmt::Display for EvAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}",
            self.hp, self.atk, self.def, self.spa, self.spd, self.spe
        )
    }
}

/// One entry of a top-N usage list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageShare {
    pub name: String,
    /// Whole percent, rounded half away from zero
    pub usage_percent: u32,
}

/// One entry of the EV spread list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadShare {
    pub nature: String,
    pub ev_allocation: EvAllocation,
    pub usage_percent: u32,
}

/// Competitive summary of one Pokémon within one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUsageSummary {
    /// Display name as keyed in the payload
    pub pokemon: String,
    pub format: String,
    /// Dataset month (e.g. "2024-09") when known
    pub timestamp: Option<String>,
    pub elo_bracket: Option<u32>,
    /// Usage weight over total battles, clamped to [0, 1]
    pub usage_rate: f64,
    pub raw_count: u64,
    /// 1-based position by descending usage weight; `None` when unused
    pub rank: Option<u32>,
    pub viability_ceiling: Option<u64>,
    pub moves: Vec<UsageShare>,
    pub abilities: Vec<UsageShare>,
    pub items: Vec<UsageShare>,
    pub teammates: Vec<UsageShare>,
    pub spreads: Vec<SpreadShare>,
}
