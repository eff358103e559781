//! Core data types for typing result resolution.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`AnalysisType`](types::AnalysisType): the analyses a sample is typed by
//! - [`RawHit`](hit::RawHit), [`HitRecord`](hit::HitRecord): a hit as
//!   delivered by the aligner, and after parsing
//! - [`Sample`](sample::Sample): one specimen with its hits and results
//! - [`ResolutionEvent`](events::ResolutionEvent),
//!   [`EventSink`](events::EventSink): recoverable conditions reported while
//!   resolving
//!
//! ## Sentinels
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `ND` | Not determined: no genus, no description, no subtype |
//! | `NA (N)` | Scheme gene absent from the genome |
//! | `NA (x)` | Scheme gene present but not matching the profile |

pub mod events;
pub mod hit;
pub mod sample;
pub mod types;
