//! Format tree builder: aggregates parsed dataset ids into a navigable index

use crate::types::{EloDataset, FormatTree, Generation, Mode, ParsedFormat};
use std::collections::BTreeMap;

/// Builder for the generation → mode → format → regulation → bracket index
pub struct FormatTreeBuilder;

type BracketKey<'a> = (Generation, Mode, &'a str, &'a str);

impl FormatTreeBuilder {
    /// Group parsed datasets into a [`FormatTree`].
    ///
    /// Duplicate `(generation, mode, format, regulation, elo)` keys: last write wins.
    /// Brackets within a regulation are ordered by descending rating.
    pub fn build(parsed: &[ParsedFormat]) -> FormatTree {
        if parsed.is_empty() {
            return FormatTree::default();
        }

        // Bracket → dataset id per regulation; later entries overwrite earlier ones
        let mut leaves: BTreeMap<BracketKey<'_>, BTreeMap<u32, &str>> = BTreeMap::new();
        for p in parsed {
            leaves
                .entry((
                    p.generation,
                    p.mode,
                    p.format_name.as_str(),
                    p.regulation.as_str(),
                ))
                .or_default()
                .insert(p.elo_bracket, p.dataset_id.as_str());
        }

        let mut tree = FormatTree::default();
        for ((generation, mode, format_name, regulation), brackets) in leaves {
            let datasets: Vec<EloDataset> = brackets
                .into_iter()
                .rev()
                .map(|(elo_bracket, dataset_id)| EloDataset {
                    elo_bracket,
                    dataset_id: dataset_id.to_string(),
                })
                .collect();

            tree.0
                .entry(generation)
                .or_default()
                .entry(mode)
                .or_default()
                .entry(format_name.to_string())
                .or_default()
                .insert(regulation.to_string(), datasets);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{parse_stem, ChaosFilenameParser, FilenameParser};
    use crate::types::DEFAULT_REGULATION;

    fn parse_all(stems: &[&str]) -> Vec<ParsedFormat> {
        stems.iter().filter_map(|s| parse_stem(s)).collect()
    }

    fn brackets(tree: &FormatTree, g: u8, mode: Mode, f: &str, r: &str) -> Vec<u32> {
        tree.brackets(Generation(g), mode, f, r)
            .unwrap()
            .iter()
            .map(|d| d.elo_bracket)
            .collect()
    }

    // ========== build() tests ==========

    #[test]
    fn test_build_empty() {
        let tree = FormatTreeBuilder::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.dataset_count(), 0);
    }

    #[test]
    fn test_build_two_brackets_higher_first() {
        let parsed = parse_all(&["gen9vgc2024regg-0", "gen9vgc2024regg-1760"]);
        let tree = FormatTreeBuilder::build(&parsed);

        let list = tree
            .brackets(Generation(9), Mode::Doubles, "vgc2024", "regg")
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].elo_bracket, 1760);
        assert_eq!(list[0].dataset_id, "gen9vgc2024regg-1760");
        assert_eq!(list[1].elo_bracket, 0);
    }

    #[test]
    fn test_build_orders_brackets_numerically_not_lexically() {
        // "500" > "1500" as strings; numeric order must win
        let parsed = parse_all(&["gen9ou-500", "gen9ou-1500", "gen9ou-1695", "gen9ou-0"]);
        let tree = FormatTreeBuilder::build(&parsed);
        assert_eq!(
            brackets(&tree, 9, Mode::Singles, "ou", DEFAULT_REGULATION),
            [1695, 1500, 500, 0]
        );
    }

    #[test]
    fn test_build_groups_all_levels() {
        let parsed = parse_all(&[
            "gen9ou-1695",
            "gen8ou-1695",
            "gen9vgc2024regg-1760",
            "gen9vgc2024regh-1760",
            "gen9vgc2025regh-1760",
            "gen9doublesou-1500",
        ]);
        let tree = FormatTreeBuilder::build(&parsed);

        let gens: Vec<Generation> = tree.generations().map(|(g, _)| *g).collect();
        assert_eq!(gens, [Generation(8), Generation(9)]);

        let gen9 = tree.get(Generation(9)).unwrap();
        assert_eq!(gen9.len(), 2);
        let doubles = &gen9[&Mode::Doubles];
        assert_eq!(
            doubles.keys().collect::<Vec<_>>(),
            ["doublesou", "vgc2024", "vgc2025"]
        );
        assert_eq!(
            doubles["vgc2024"].keys().collect::<Vec<_>>(),
            ["regg", "regh"]
        );
        assert_eq!(tree.dataset_count(), 6);
    }

    #[test]
    fn test_build_duplicate_key_last_write_wins() {
        let first = parse_stem("gen9ou-1695").unwrap();
        let mut second = first.clone();
        second.dataset_id = "gen9ou-1695-mirror".into();

        let tree = FormatTreeBuilder::build(&[first, second]);
        let list = tree
            .brackets(Generation(9), Mode::Singles, "ou", DEFAULT_REGULATION)
            .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].dataset_id, "gen9ou-1695-mirror");
    }

    #[test]
    fn test_build_deterministic() {
        let parsed = parse_all(&["gen9ou-1500", "gen9ou-0", "gen9vgc2024regg-1760"]);
        let mut reversed = parsed.clone();
        reversed.reverse();
        assert_eq!(
            FormatTreeBuilder::build(&parsed),
            FormatTreeBuilder::build(&reversed)
        );
    }

    #[test]
    fn test_build_from_listing_with_noise() {
        let names = [
            "meta.json",
            "gen9ou-1695.json",
            "not-a-dataset.json",
            "gen9ou-0.json",
        ];
        let parsed = ChaosFilenameParser::new().parse_listing(&names);
        let tree = FormatTreeBuilder::build(&parsed);
        assert_eq!(
            brackets(&tree, 9, Mode::Singles, "ou", DEFAULT_REGULATION),
            [1695, 0]
        );
    }
}
