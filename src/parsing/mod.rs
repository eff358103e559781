//! Parsers for typing inputs.
//!
//! This module provides parsers for:
//!
//! - **Target identifiers**: the colon and underscore grammars used by typing
//!   databases ([`identifier`])
//! - **Hit tables**: TSV/CSV (optionally gzipped) tables of aligner hits
//!   ([`hits`])
//! - **Sample metadata**: JSON genus assignments and allele-typing results
//!   ([`samples`])
//! - **Prior reports**: CSV reports from an earlier run, for resuming
//!   ([`report`])
//!
//! ## Example
//!
//! ```rust
//! use typing_resolver::parsing::hits::parse_hit_table;
//! use typing_resolver::parsing::samples::assemble_samples;
//!
//! let tsv = "sample\tanalysis\ttarget\tidentity\n\
//! 2014-SEQ-0276\tresfinder\tsul1_1_AY224185\t100.00\n";
//! let table = parse_hit_table(tsv.as_bytes(), b'\t').unwrap();
//! let samples = assemble_samples(Vec::new(), table);
//! assert_eq!(samples[0].name, "2014-SEQ-0276");
//! ```
//!
//! ## Identifier Grammar
//!
//! | Example | Gene | Allele | Accession | Subtype |
//! |---------|------|--------|-----------|---------|
//! | `stx2A:63:AF500190:d` | `stx2A` | `63` | `AF500190` | `d` |
//! | `eae:12:AB12345` | `eae` | `12` | `AB12345` | |
//! | `ARR-2_1_HQ141279` | `ARR-2` | `1` | `HQ141279` | |
//! | `stx2A_AF500190_d` (verotoxin) | `stx2A` | | `AF500190` | `d` |

pub mod hits;
pub mod identifier;
pub mod report;
pub mod samples;
