use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::sample::Sample;
use crate::core::types::AnalysisType;
use crate::report::rows::{
    gdcs_rows, plasmid_rows, prophage_rows, resistance_rows, toxin_rows, univec_rows,
    virulence_rows, ReportEntry, ReportRow,
};
use crate::resolving::engine::Lookups;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),
}

/// File name of the report written for an analysis
#[must_use]
pub fn report_file_name(analysis: AnalysisType) -> Option<&'static str> {
    match analysis {
        AnalysisType::Gdcs => Some("gdcs.csv"),
        AnalysisType::Resfinder => Some("resfinder.csv"),
        AnalysisType::Virulence => Some("virulence.csv"),
        AnalysisType::Verotoxin => Some("verotoxin_summary.csv"),
        AnalysisType::Prophages => Some("prophages.csv"),
        AnalysisType::Univec => Some("univec.csv"),
        AnalysisType::Plasmids => Some("plasmids.csv"),
        AnalysisType::Mlst | AnalysisType::Rmlst | AnalysisType::Cgmlst => None,
    }
}

/// Write entries as CSV. The strain cell is left blank on every row after
/// the first of a sample; name-only entries are a single cell.
///
/// # Errors
///
/// Returns `ReportError` if writing fails.
pub fn write_report<W: Write, R: ReportRow>(
    writer: W,
    entries: &[ReportEntry<R>],
) -> Result<(), ReportError> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(R::HEADER)?;

    let mut previous: Option<&str> = None;
    for entry in entries {
        let strain = entry.strain();
        let strain_cell = if previous == Some(strain) { "" } else { strain };
        previous = Some(strain);

        match entry {
            ReportEntry::Row(row) => {
                let mut record = Vec::with_capacity(R::HEADER.len());
                record.push(strain_cell.to_string());
                record.extend(row.cells());
                wtr.write_record(&record)?;
            }
            ReportEntry::NameOnly(_) => wtr.write_record([strain_cell])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_to_path<R: ReportRow>(path: &Path, entries: &[ReportEntry<R>]) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_report(std::io::BufWriter::new(file), entries)
}

/// Write every report for the resolved samples into `dir`, creating it if
/// needed. Returns the paths written, in analysis order.
///
/// # Errors
///
/// Returns `ReportError` if the directory or a report cannot be written.
pub fn write_reports(
    dir: &Path,
    samples: &[Sample],
    lookups: &Lookups,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let mut target = |analysis: AnalysisType| {
        let path = dir.join(report_file_name(analysis).unwrap_or(analysis.as_str()));
        written.push(path.clone());
        path
    };

    write_to_path(&target(AnalysisType::Gdcs), &gdcs_rows(samples))?;
    write_to_path(
        &target(AnalysisType::Resfinder),
        &resistance_rows(samples, lookups),
    )?;
    write_to_path(
        &target(AnalysisType::Virulence),
        &virulence_rows(samples, lookups),
    )?;
    write_to_path(&target(AnalysisType::Verotoxin), &toxin_rows(samples))?;
    write_to_path(
        &target(AnalysisType::Prophages),
        &prophage_rows(samples, lookups),
    )?;
    write_to_path(
        &target(AnalysisType::Univec),
        &univec_rows(samples, lookups),
    )?;
    write_to_path(&target(AnalysisType::Plasmids), &plasmid_rows(samples))?;

    tracing::info!("Wrote {} reports to {}", written.len(), dir.display());
    Ok(written)
}
