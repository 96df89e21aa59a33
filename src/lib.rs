//! chaosdex: competitive usage-statistics ingestion
//!
//! Decodes chaos archive filenames into a navigable format index and turns raw
//! per-Pokémon counters into ranked, percentage-based usage summaries.

pub mod cli;
pub mod config;
pub mod parsers;
pub mod services;
pub mod types;
