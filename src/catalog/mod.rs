//! Read-only reference data shared by every sample in a run.
//!
//! - [`store::ExpectedCatalogue`]: expected MLST/rMLST/cgMLST genes per genus
//! - [`descriptions::GeneDescriptions`]: gene annotations from `notes.txt`
//!   style files (virulence descriptions, resistance classes)
//! - [`prophages::ProphageHosts`]: prophage id to host lookup
//! - [`targets::TargetDescriptions`]: target descriptions from FASTA headers
//!   (UniVec contaminant screens)
//!
//! ## Embedded Catalogue
//!
//! The default catalogue compiled into the binary carries the seven-gene MLST
//! schemes for common enteric and food-borne genera. rMLST and cgMLST gene
//! lists are large and version-specific, so they are supplied with
//! `--catalogue`.
//!
//! ```rust,no_run
//! use typing_resolver::ExpectedCatalogue;
//! use typing_resolver::core::types::AnalysisType;
//!
//! let catalogue = ExpectedCatalogue::load_embedded().unwrap();
//! let genes = catalogue.expected("Escherichia", AnalysisType::Mlst);
//! assert_eq!(genes.map(|g| g.len()), Some(7));
//! ```

pub mod descriptions;
pub mod prophages;
pub mod store;
pub mod targets;
