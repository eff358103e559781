//! # typing-resolver
//!
//! A library for resolving bacterial typing hits into per-sample gene calls.
//!
//! Typing pipelines align every assembly against several gene databases
//! (MLST/rMLST/cgMLST schemes, ResFinder, virulence factors, verotoxin
//! subtypes, prophages, UniVec, plasmids). Each alignment yields many overlapping hits per
//! gene, with allele variants, subunits and near-identical sequences
//! competing for the same call.
//!
//! `typing-resolver` turns those raw hits into authoritative results:
//!
//! ## Features
//!
//! - **Identifier grammar**: Parses colon and underscore target identifiers
//!   into gene, allele, accession and subtype
//! - **Best calls**: Keeps the best-identity hits per gene, with all
//!   exact ties reported
//! - **Core-genome tallies**: Scores MLST, rMLST and cgMLST completeness
//!   against an expected catalogue
//! - **Verotoxin subtyping**: Pairs A and B subunit hits into `vtx` subtypes
//! - **Reports**: Writes CSV reports, and resumes from earlier ones
//!
//! ## Example
//!
//! ```rust
//! use typing_resolver::core::hit::RawHit;
//! use typing_resolver::core::sample::Sample;
//! use typing_resolver::core::types::AnalysisType;
//! use typing_resolver::{ExpectedCatalogue, Lookups, TypingEngine};
//!
//! // Load the embedded catalogue of expected scheme genes
//! let catalogue = ExpectedCatalogue::load_embedded().unwrap();
//! let lookups = Lookups::default();
//!
//! let mut sample = Sample::new("2014-SEQ-0276").with_genus("Escherichia");
//! sample.add_hit(AnalysisType::Resfinder, RawHit::new("sul1_1_AY224185", "100.00"));
//! sample.add_hit(AnalysisType::Resfinder, RawHit::new("sul1_3_EU780013", "99.10"));
//!
//! let engine = TypingEngine::new(&catalogue, &lookups);
//! let sample = engine.resolve_sample(sample);
//!
//! let calls = sample.gene_calls(AnalysisType::Resfinder).unwrap();
//! assert_eq!(calls.winners().winners.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Expected-gene catalogue and annotation lookups
//! - [`core`]: Core data types for hits, samples and events
//! - [`parsing`]: Parsers for identifiers, hit tables, metadata and reports
//! - [`resolving`]: Resolution engine and resolvers
//! - [`report`]: Report rows and CSV output
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Input limits and validation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod report;
pub mod resolving;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::ExpectedCatalogue;
pub use crate::core::events::{EventSink, ResolutionEvent, TracingSink};
pub use crate::core::hit::{HitRecord, RawHit};
pub use crate::core::sample::Sample;
pub use crate::core::types::*;
pub use resolving::engine::{Lookups, ResolverConfig, TypingEngine};
