//! `chaosdex summary` subcommand

use std::path::PathBuf;

use clap::Args;

use crate::config::ChaosConfig;
use crate::services::usage_stats::DEFAULT_TOP_N;
use crate::services::DataLoaderService;
use crate::types::{NormalizedUsageSummary, UsageShare};

/// Show the usage summary of one Pokémon
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Dataset id, e.g. gen9vgc2024regg-1760
    #[arg(long)]
    pub dataset: String,

    /// Pokémon display name or slug
    #[arg(long)]
    pub pokemon: String,

    /// Archive directory (chaos datasets plus meta.json)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Entries per list
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SummaryArgs {
    pub fn run(self) -> anyhow::Result<()> {
        let config = ChaosConfig::new()
            .with_archive_dir(self.dir)
            .with_cache_dir(None)
            .with_top_n(self.top);
        let loader = DataLoaderService::new(config)?;

        match loader.load_summary(&self.dataset, &self.pokemon)? {
            Some(summary) if self.json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Some(summary) => print!("{}", render_summary(&summary)),
            None if self.json => println!("null"),
            None => println!("No data for '{}' in {}", self.pokemon, self.dataset),
        }
        Ok(())
    }
}

fn render_summary(s: &NormalizedUsageSummary) -> String {
    let rank = s
        .rank
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "unranked".into());
    let mut out = format!(
        "{} - {} ({}, {}+)\n",
        s.pokemon,
        s.format,
        s.timestamp.as_deref().unwrap_or("unknown date"),
        s.elo_bracket.unwrap_or(0)
    );
    out.push_str(&format!(
        "Usage: {:.2}% {} ({} teams)\n",
        s.usage_rate * 100.0,
        rank,
        s.raw_count
    ));

    render_list(&mut out, "Moves", &s.moves);
    render_list(&mut out, "Abilities", &s.abilities);
    render_list(&mut out, "Items", &s.items);
    render_list(&mut out, "Teammates", &s.teammates);

    if !s.spreads.is_empty() {
        out.push_str("Spreads:\n");
        for spread in &s.spreads {
            out.push_str(&format!(
                "  {:>3}%  {} {}\n",
                spread.usage_percent, spread.nature, spread.ev_allocation
            ));
        }
    }
    out
}

fn render_list(out: &mut String, title: &str, shares: &[UsageShare]) {
    if shares.is_empty() {
        return;
    }
    out.push_str(&format!("{}:\n", title));
    for share in shares {
        out.push_str(&format!("  {:>3}%  {}\n", share.usage_percent, share.name));
    }
}
