//! Chaos payload decoder
//!
//! Decodes the raw statistics document of one dataset into [`RawUsageStats`].

use crate::types::{ChaosError, Counters, RawPokemonStats, RawUsageStats, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct ChaosDocument {
    info: ChaosInfo,
    data: HashMap<String, ChaosPokemon>,
}

#[derive(Deserialize)]
struct ChaosInfo {
    metagame: String,
    #[serde(default)]
    cutoff: Option<f64>,
    #[serde(rename = "number of battles")]
    number_of_battles: u64,
}

#[derive(Deserialize)]
struct ChaosPokemon {
    #[serde(rename = "Raw count")]
    raw_count: u64,
    #[serde(rename = "Moves", default)]
    moves: Counters,
    #[serde(rename = "Abilities", default)]
    abilities: Counters,
    #[serde(rename = "Items", default)]
    items: Counters,
    #[serde(rename = "Teammates", default)]
    teammates: Counters,
    #[serde(rename = "Spreads", default)]
    spreads: Counters,
    #[serde(rename = "Viability Ceiling", default)]
    viability_ceiling: Option<Vec<u64>>,
}

impl From<ChaosPokemon> for RawPokemonStats {
    fn from(p: ChaosPokemon) -> Self {
        Self {
            raw_count: p.raw_count,
            moves: p.moves,
            abilities: p.abilities,
            items: p.items,
            teammates: p.teammates,
            spreads: p.spreads,
            viability_ceiling: p.viability_ceiling,
        }
    }
}

/// Decode a chaos document held in an owned, mutable buffer.
///
/// The buffer is used as scratch space by simd_json and is left unspecified afterwards.
pub fn decode_payload(bytes: &mut [u8]) -> Result<RawUsageStats> {
    let doc: ChaosDocument =
        simd_json::from_slice(bytes).map_err(|e| ChaosError::Parse(e.to_string()))?;

    let cutoff = match doc.info.cutoff {
        Some(c) if c.is_finite() && c >= 0.0 && c <= u32::MAX as f64 => Some(c as u32),
        Some(c) => {
            return Err(ChaosError::Payload(format!("invalid cutoff {}", c)));
        }
        None => None,
    };

    Ok(RawUsageStats {
        metagame: doc.info.metagame,
        cutoff,
        date: None,
        total_battles: doc.info.number_of_battles,
        per_pokemon: doc
            .data
            .into_iter()
            .map(|(name, stats)| (name, stats.into()))
            .collect(),
    })
}

/// Read and decode a chaos document from disk
pub fn load_payload(path: &Path) -> Result<RawUsageStats> {
    let mut bytes = fs::read(path)?;
    decode_payload(&mut bytes)
}
