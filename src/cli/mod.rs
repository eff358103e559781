//! Command-line interface for typing-resolver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Resolve a hit table into per-sample calls and write reports
//! - **subtype**: Call verotoxin subtypes from identifiers given on the command line
//! - **catalog**: List, show, or export the expected-gene catalogue
//!
//! ## Usage
//!
//! ```text
//! # Resolve hits and write reports
//! typing-resolver resolve hits.tsv.gz --samples samples.json --report-dir reports/
//!
//! # Reuse reports from an earlier run
//! typing-resolver resolve hits.tsv --report-dir reports/ --resume
//!
//! # Subtype a handful of hits
//! typing-resolver subtype stx2A:90:ACC:a=98.5 stx2B:12:ACC:a=97.0
//!
//! # JSON output for scripting
//! typing-resolver catalog list --format json
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod resolve;
pub mod subtype;

#[derive(Parser)]
#[command(name = "typing-resolver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Resolve bacterial typing hits into per-sample gene calls")]
#[command(
    long_about = "typing-resolver consolidates per-target alignment hits into authoritative per-sample typing results.\n\nIt provides:\n- Best-identity gene calls for ResFinder, virulence and prophage hits\n- Core-genome completeness (GDCS) tallies over MLST, rMLST and cgMLST\n- Verotoxin subtypes from paired A/B subunit hits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a hit table and write reports
    Resolve(resolve::ResolveArgs),

    /// Call verotoxin subtypes from target identifiers
    Subtype(subtype::SubtypeArgs),

    /// Inspect the expected-gene catalogue
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
