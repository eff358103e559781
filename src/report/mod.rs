//! Row-oriented report assembly and CSV output.
//!
//! Multi-valued analyses (ResFinder, virulence, prophages, UniVec, plasmids)
//! produce one row per reported hit, and a row holding only the sample name
//! when a sample has nothing to report. Summaries (GDCS, verotoxin) produce exactly one row per
//! sample.

pub mod rows;
pub mod writer;

pub use rows::{ReportEntry, ReportRow};
pub use writer::{report_file_name, write_report, write_reports, ReportError};
