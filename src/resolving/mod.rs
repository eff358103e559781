//! Resolution of raw typing hits into per-sample calls.
//!
//! - [`TypingEngine`]: parses each sample's hits and runs every resolver
//! - [`best_call`]: best identity per gene token, with exact-tie winners
//! - [`tally`]: core-genome completeness ratios (GDCS)
//! - [`verotoxin`]: A/B subunit pairing into verotoxin subtypes
//!
//! ## Flow
//!
//! For each sample:
//!
//! 1. Raw hits are parsed into [`HitRecord`](crate::core::hit::HitRecord)s.
//!    Malformed records are skipped and reported as events.
//! 2. ResFinder, virulence, prophage, UniVec and plasmid hits go through
//!    the best-call resolver.
//! 3. Verotoxin hits go through the subtype resolver.
//! 4. Scheme results are tallied against the expected catalogue.
//!
//! Samples are independent and resolved in parallel.
//!
//! ## Example
//!
//! ```rust
//! use typing_resolver::core::hit::RawHit;
//! use typing_resolver::core::sample::Sample;
//! use typing_resolver::core::types::AnalysisType;
//! use typing_resolver::{ExpectedCatalogue, Lookups, TypingEngine};
//!
//! let catalogue = ExpectedCatalogue::load_embedded().unwrap();
//! let lookups = Lookups::default();
//! let engine = TypingEngine::new(&catalogue, &lookups);
//!
//! let mut sample = Sample::new("2014-SEQ-0276").with_genus("Escherichia");
//! sample.add_hit(AnalysisType::Verotoxin, RawHit::new("stx2A:90:ACC:a", "98.5"));
//! sample.add_hit(AnalysisType::Verotoxin, RawHit::new("stx2B:12:ACC:a", "97.0"));
//!
//! let sample = engine.resolve_sample(sample);
//! assert_eq!(sample.verotoxin().unwrap().summary(), "vtx2a");
//! ```

pub mod best_call;
pub mod engine;
pub mod tally;
pub mod verotoxin;

pub use best_call::BestCalls;
pub use engine::{Lookups, ResolverConfig, TypingEngine};
pub use tally::{CoreTally, Ratio};
pub use verotoxin::{SubtypeComposite, VerotoxinProfile};
