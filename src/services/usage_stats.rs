//! Usage stat normalizer: raw chaos counters → per-Pokémon competitive summary
//!
//! Percentages are whole numbers, rounded half away from zero. Lists are sorted by
//! descending count with ties broken by ascending name, so repeated calls on the same
//! payload always produce the same output.

use crate::services::normalizer::to_slug;
use crate::types::{
    ChaosError, Counters, EvAllocation, NormalizedUsageSummary, RawPokemonStats, RawUsageStats,
    Result, SpreadShare, UsageShare,
};
use std::cmp::Ordering;

/// Default length of every top-N list
pub const DEFAULT_TOP_N: usize = 10;

/// Normalizer for per-Pokémon usage summaries
#[derive(Debug, Clone, Copy)]
pub struct UsageStatNormalizer {
    top_n: usize,
}

impl Default for UsageStatNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl UsageStatNormalizer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Build the summary for `pokemon_name`.
    ///
    /// `Ok(None)` when the Pokémon is not in the payload. `Err` only when the
    /// payload violates its shape contract (unparsable spread key, zero battles
    /// with recorded usage).
    pub fn normalize(
        &self,
        raw: &RawUsageStats,
        pokemon_name: &str,
    ) -> Result<Option<NormalizedUsageSummary>> {
        let Some(key) = resolve_name(raw, pokemon_name) else {
            return Ok(None);
        };
        let stats = &raw.per_pokemon[key];

        if raw.total_battles == 0 && stats.raw_count > 0 {
            return Err(ChaosError::Payload(format!(
                "{}: '{}' has {} appearances but the payload reports zero battles",
                raw.metagame, key, stats.raw_count
            )));
        }

        let spreads = self.spreads(key, stats)?;

        Ok(Some(NormalizedUsageSummary {
            pokemon: key.to_string(),
            format: raw.metagame.clone(),
            timestamp: raw.date.clone(),
            elo_bracket: raw.cutoff,
            usage_rate: usage_rate(stats.raw_count, raw.total_battles),
            raw_count: stats.raw_count,
            rank: rank(raw, key),
            viability_ceiling: stats
                .viability_ceiling
                .as_ref()
                .and_then(|v| v.get(1).copied()),
            moves: self.shares(&stats.moves),
            abilities: self.shares(&stats.abilities),
            items: self.shares(&stats.items),
            teammates: self.shares(&stats.teammates),
            spreads,
        }))
    }

    /// Percent of the category total, positive entries only, top N
    fn shares(&self, counters: &Counters) -> Vec<UsageShare> {
        let entries = positive_entries(counters);
        let total: f64 = entries.iter().map(|(_, count)| count).sum();

        entries
            .into_iter()
            .map(|(name, count)| UsageShare {
                name: name.to_string(),
                usage_percent: percent(count, total),
            })
            .filter(|share| share.usage_percent > 0)
            .take(self.top_n)
            .collect()
    }

    /// Parsed spreads as percent of all spread counts, top N
    fn spreads(&self, pokemon: &str, stats: &RawPokemonStats) -> Result<Vec<SpreadShare>> {
        let entries = positive_entries(&stats.spreads);
        let total: f64 = entries.iter().map(|(_, count)| count).sum();

        let mut shares = Vec::with_capacity(entries.len().min(self.top_n));
        for (key, count) in entries {
            // Parse every key so corrupted spreads surface even outside the top N
            let (nature, ev_allocation) = parse_spread(key).map_err(|e| {
                ChaosError::Payload(format!("{}: bad spread '{}': {}", pokemon, key, e))
            })?;
            let usage_percent = percent(count, total);
            if usage_percent > 0 && shares.len() < self.top_n {
                shares.push(SpreadShare {
                    nature,
                    ev_allocation,
                    usage_percent,
                });
            }
        }
        Ok(shares)
    }
}

/// Resolve a requested name to the payload's display-name key.
///
/// Exact key first, then slug comparison; among several slug matches the
/// lexically smallest key wins.
pub fn resolve_name<'a>(raw: &'a RawUsageStats, pokemon_name: &str) -> Option<&'a str> {
    if let Some((key, _)) = raw.per_pokemon.get_key_value(pokemon_name) {
        return Some(key.as_str());
    }
    if pokemon_name.trim().is_empty() {
        return None;
    }
    let wanted = to_slug(pokemon_name);
    raw.per_pokemon
        .keys()
        .filter(|key| to_slug(key) == wanted)
        .min()
        .map(String::as_str)
}

/// Usage weight over total battles, clamped to [0, 1]
pub fn usage_rate(raw_count: u64, total_battles: u64) -> f64 {
    if total_battles == 0 {
        return 0.0;
    }
    (raw_count as f64 / total_battles as f64).clamp(0.0, 1.0)
}

/// 1-based rank by descending usage weight, ties by ascending name.
/// Unused Pokémon (zero weight) are unranked.
pub fn rank(raw: &RawUsageStats, key: &str) -> Option<u32> {
    let own = raw.per_pokemon.get(key)?.raw_count;
    if own == 0 {
        return None;
    }
    let ahead = raw
        .per_pokemon
        .iter()
        .filter(|(name, stats)| match stats.raw_count.cmp(&own) {
            Ordering::Greater => true,
            Ordering::Equal => name.as_str() < key,
            Ordering::Less => false,
        })
        .count();
    u32::try_from(ahead + 1).ok()
}

/// Whole percent of `count / total`, rounded half away from zero
pub fn percent(count: f64, total: f64) -> u32 {
    if total <= 0.0 {
        return 0;
    }
    ((count / total) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Non-empty names with positive counts, sorted by count desc then name asc
fn positive_entries(counters: &Counters) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = counters
        .iter()
        .filter(|(name, count)| !name.is_empty() && count.is_finite() && **count > 0.0)
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Split `Nature:HP/Atk/Def/SpA/SpD/Spe`
fn parse_spread(key: &str) -> std::result::Result<(String, EvAllocation), String> {
    let (nature, evs) = key
        .split_once(':')
        .ok_or_else(|| "missing ':' separator".to_string())?;
    let nature = nature.trim();
    if nature.is_empty() || !nature.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("invalid nature '{}'", nature));
    }
    Ok((nature.to_string(), evs.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::load_payload;
    use std::collections::HashMap;
    use std::path::Path;

    fn fixture() -> RawUsageStats {
        let mut raw =
            load_payload(Path::new("tests/fixtures/archive/gen9vgc2024regg-1760.json")).unwrap();
        raw.date = Some("2024-09".into());
        raw
    }

    fn counters(pairs: &[(&str, f64)]) -> Counters {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn payload(entries: &[(&str, u64)], total_battles: u64) -> RawUsageStats {
        RawUsageStats {
            metagame: "gen9ou".into(),
            cutoff: Some(1695),
            date: None,
            total_battles,
            per_pokemon: entries
                .iter()
                .map(|(name, count)| {
                    (
                        name.to_string(),
                        RawPokemonStats {
                            raw_count: *count,
                            ..Default::default()
                        },
                    )
                })
                .collect::<HashMap<_, _>>(),
        }
    }

    fn names(shares: &[UsageShare]) -> Vec<&str> {
        shares.iter().map(|s| s.name.as_str()).collect()
    }

    fn percents(shares: &[UsageShare]) -> Vec<u32> {
        shares.iter().map(|s| s.usage_percent).collect()
    }

    // ========== normalize() on fixture ==========

    #[test]
    fn test_normalize_header_fields() {
        let summary = UsageStatNormalizer::default()
            .normalize(&fixture(), "Incineroar")
            .unwrap()
            .unwrap();

        assert_eq!(summary.pokemon, "Incineroar");
        assert_eq!(summary.format, "gen9vgc2024regg");
        assert_eq!(summary.timestamp.as_deref(), Some("2024-09"));
        assert_eq!(summary.elo_bracket, Some(1760));
        assert!((summary.usage_rate - 0.6).abs() < 1e-12);
        assert_eq!(summary.raw_count, 600);
        assert_eq!(summary.rank, Some(1));
        assert_eq!(summary.viability_ceiling, Some(90));
    }

    #[test]
    fn test_normalize_moves_sorted_with_name_tie_break() {
        let summary = UsageStatNormalizer::default()
            .normalize(&fixture(), "Incineroar")
            .unwrap()
            .unwrap();

        // Empty-slot key is ignored; flareblitz and taunt tie at 250
        assert_eq!(
            names(&summary.moves),
            ["fakeout", "partingshot", "knockoff", "flareblitz", "taunt", "willowisp"]
        );
        assert_eq!(percents(&summary.moves), [28, 20, 15, 13, 13, 12]);
    }

    #[test]
    fn test_normalize_drops_zero_percent_entries() {
        let summary = UsageStatNormalizer::default()
            .normalize(&fixture(), "Incineroar")
            .unwrap()
            .unwrap();

        // blaze is 2/600 → rounds to 0%
        assert_eq!(names(&summary.abilities), ["intimidate"]);
        assert_eq!(percents(&summary.abilities), [100]);
    }

    #[test]
    fn test_normalize_items_and_teammates() {
        let summary = UsageStatNormalizer::default()
            .normalize(&fixture(), "Incineroar")
            .unwrap()
            .unwrap();

        assert_eq!(
            names(&summary.items),
            ["safetygoggles", "sitrusberry", "assaultvest"]
        );
        assert_eq!(percents(&summary.items), [50, 33, 17]);

        // Negative teammate weight is excluded from list and total
        assert_eq!(
            names(&summary.teammates),
            ["Flutter Mane", "Rillaboom", "Amoonguss"]
        );
        assert_eq!(percents(&summary.teammates), [50, 33, 17]);
    }

    #[test]
    fn test_normalize_spreads() {
        let summary = UsageStatNormalizer::default()
            .normalize(&fixture(), "Incineroar")
            .unwrap()
            .unwrap();

        let natures: Vec<&str> = summary.spreads.iter().map(|s| s.nature.as_str()).collect();
        assert_eq!(natures, ["Careful", "Adamant", "Impish"]);
        let spread_percents: Vec<u32> = summary.spreads.iter().map(|s| s.usage_percent).collect();
        assert_eq!(spread_percents, [60, 20, 20]);
        assert_eq!(summary.spreads[0].ev_allocation.hp, 252);
        assert_eq!(summary.spreads[0].ev_allocation.spd, 252);
        assert_eq!(summary.spreads[0].ev_allocation.to_string(), "252/4/0/0/252/0");
    }

    #[test]
    fn test_normalize_rank_tie_broken_by_name() {
        let raw = fixture();
        let normalizer = UsageStatNormalizer::default();
        let flutter = normalizer.normalize(&raw, "Flutter Mane").unwrap().unwrap();
        let rilla = normalizer.normalize(&raw, "Rillaboom").unwrap().unwrap();
        let amoong = normalizer.normalize(&raw, "Amoonguss").unwrap().unwrap();

        assert_eq!(flutter.rank, Some(2));
        assert_eq!(rilla.rank, Some(3));
        assert_eq!(amoong.rank, Some(4));
    }

    #[test]
    fn test_normalize_unused_pokemon_is_unranked() {
        let summary = UsageStatNormalizer::default()
            .normalize(&fixture(), "Mr. Rime")
            .unwrap()
            .unwrap();
        assert_eq!(summary.rank, None);
        assert_eq!(summary.usage_rate, 0.0);
        assert!(summary.moves.is_empty());
        assert!(summary.spreads.is_empty());
    }

    #[test]
    fn test_normalize_missing_pokemon() {
        let raw = fixture();
        let normalizer = UsageStatNormalizer::default();
        assert!(normalizer.normalize(&raw, "Nonexistent").unwrap().is_none());
        assert!(normalizer.normalize(&raw, "").unwrap().is_none());
    }

    #[test]
    fn test_normalize_resolves_slug_and_case() {
        let raw = fixture();
        let normalizer = UsageStatNormalizer::default();
        let by_slug = normalizer.normalize(&raw, "flutter-mane").unwrap().unwrap();
        let by_case = normalizer.normalize(&raw, "FLUTTER MANE").unwrap().unwrap();
        let by_punct = normalizer.normalize(&raw, "mr rime").unwrap().unwrap();
        assert_eq!(by_slug.pokemon, "Flutter Mane");
        assert_eq!(by_case.pokemon, "Flutter Mane");
        assert_eq!(by_punct.pokemon, "Mr. Rime");
    }

    #[test]
    fn test_normalize_deterministic() {
        let raw = fixture();
        let normalizer = UsageStatNormalizer::default();
        for name in ["Incineroar", "Flutter Mane", "Rillaboom"] {
            let a = normalizer.normalize(&raw, name).unwrap();
            let b = normalizer.normalize(&raw.clone(), name).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_normalize_top_n_truncates() {
        let summary = UsageStatNormalizer::new(2)
            .normalize(&fixture(), "Incineroar")
            .unwrap()
            .unwrap();
        assert_eq!(names(&summary.moves), ["fakeout", "partingshot"]);
        assert_eq!(summary.spreads.len(), 2);
    }

    #[test]
    fn test_move_percent_sum_bounded() {
        let raw = fixture();
        let normalizer = UsageStatNormalizer::new(usize::MAX);
        for name in raw.per_pokemon.keys() {
            let summary = normalizer.normalize(&raw, name).unwrap().unwrap();
            let sum: u32 = summary.moves.iter().map(|m| m.usage_percent).sum();
            // each entry may round up by at most half a percent
            assert!(sum as usize <= 100 + summary.moves.len() / 2, "{}: {}", name, sum);
            assert!(summary.moves.iter().all(|m| m.usage_percent > 0));
        }
    }

    // ========== Payload contract violations ==========

    #[test]
    fn test_normalize_bad_spread_key_fails() {
        let mut raw = payload(&[("Great Tusk", 10)], 10);
        if let Some(tusk) = raw.per_pokemon.get_mut("Great Tusk") {
            tusk.spreads = counters(&[("Jolly:0/252/4/0/0/252", 8.0), ("Jolly-0/252", 2.0)]);
        }
        let err = UsageStatNormalizer::default()
            .normalize(&raw, "Great Tusk")
            .unwrap_err();
        assert!(matches!(err, ChaosError::Payload(_)));
    }

    #[test]
    fn test_normalize_zero_battles_with_usage_fails() {
        let raw = payload(&[("Great Tusk", 10)], 0);
        let err = UsageStatNormalizer::default()
            .normalize(&raw, "Great Tusk")
            .unwrap_err();
        assert!(matches!(err, ChaosError::Payload(_)));
    }

    // ========== Helpers ==========

    #[test]
    fn test_usage_rate_clamped() {
        assert_eq!(usage_rate(0, 0), 0.0);
        assert!((usage_rate(1, 4) - 0.25).abs() < f64::EPSILON);
        assert_eq!(usage_rate(3000, 1000), 1.0);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1.0, 8.0), 13); // 12.5 rounds away from zero
        assert_eq!(percent(1.0, 3.0), 33);
        assert_eq!(percent(2.0, 3.0), 67);
        assert_eq!(percent(1.0, 0.0), 0);
        assert_eq!(percent(1.0, 1000.0), 0);
    }

    #[test]
    fn test_rank_all_tied() {
        let raw = payload(&[("Chien-Pao", 5), ("Chi-Yu", 5), ("Ting-Lu", 5)], 10);
        assert_eq!(rank(&raw, "Chi-Yu"), Some(1));
        assert_eq!(rank(&raw, "Chien-Pao"), Some(2));
        assert_eq!(rank(&raw, "Ting-Lu"), Some(3));
        assert_eq!(rank(&raw, "Wo-Chien"), None);
    }

    #[test]
    fn test_resolve_name_prefers_exact_key() {
        let raw = payload(&[("Mr. Mime", 1), ("Mr Mime", 1)], 10);
        assert_eq!(resolve_name(&raw, "Mr Mime"), Some("Mr Mime"));
        assert_eq!(resolve_name(&raw, "mr-mime"), Some("Mr Mime"));
    }

    #[test]
    fn test_parse_spread() {
        let (nature, evs) = parse_spread("Timid:4/0/0/252/0/252").unwrap();
        assert_eq!(nature, "Timid");
        assert_eq!(evs.spe, 252);
        assert!(parse_spread("Timid").is_err());
        assert!(parse_spread(":4/0/0/252/0/252").is_err());
        assert!(parse_spread("Timid:4/0/0/252").is_err());
    }
}
