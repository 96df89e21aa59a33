mod summary;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ChaosConfig;
use crate::services::{to_slug, DataLoaderService};
use crate::types::FormatIndex;

pub use summary::SummaryArgs;

/// Competitive usage-statistics indexer for chaos archives
#[derive(Parser)]
#[command(name = "chaosdex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the generation → mode → format → regulation → Elo index
    Index {
        /// Archive directory (chaos datasets plus meta.json)
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Index cache directory (default: ~/.chaosdex/cache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Always rebuild, never read or write the index cache
        #[arg(long)]
        no_cache: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the usage summary of one Pokémon in one dataset
    Summary(SummaryArgs),

    /// Print the canonical slug of each name
    Slug {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Index {
                dir,
                cache_dir,
                no_cache,
                json,
            } => {
                let mut config = ChaosConfig::new().with_archive_dir(dir);
                if no_cache {
                    config = config.with_cache_dir(None);
                } else if cache_dir.is_some() {
                    config = config.with_cache_dir(cache_dir);
                }

                let result = DataLoaderService::new(config)?.load_index()?;
                if let Some(warning) = &result.cache_warning {
                    eprintln!("[chaosdex] Warning: {}", warning);
                }

                if json {
                    println!("{}", serde_json::to_string_pretty(&result.index)?);
                } else {
                    print!("{}", render_index(&result.index));
                }
                Ok(())
            }
            Commands::Summary(args) => args.run(),
            Commands::Slug { names } => {
                for name in names {
                    println!("{}", to_slug(&name));
                }
                Ok(())
            }
        }
    }
}

/// Indented text rendering of the served index
fn render_index(index: &FormatIndex) -> String {
    let mut out = format!("date: {}\n", index.date.as_deref().unwrap_or("unknown"));
    if index.structure.is_empty() {
        out.push_str("(no datasets)\n");
        return out;
    }
    for (generation, modes) in index.structure.generations() {
        out.push_str(&format!("{}\n", generation));
        for (mode, formats) in modes {
            out.push_str(&format!("  {}\n", mode));
            for (format_name, regulations) in formats {
                out.push_str(&format!("    {}\n", format_name));
                for (regulation, brackets) in regulations {
                    let elos: Vec<String> =
                        brackets.iter().map(|b| b.elo_bracket.to_string()).collect();
                    out.push_str(&format!("      {}: {}\n", regulation, elos.join(", ")));
                }
            }
        }
    }
    out
}
