//! Readers for previously written reports, used to resume a run without
//! recomputing finished analyses.
//!
//! The CSV writer leaves the strain cell blank on repeated rows, so a blank
//! strain inherits the sample of the row above.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::core::events::{EventSink, ResolutionEvent};
use crate::core::hit::HitRecord;
use crate::core::sample::{AnalysisResult, Sample};
use crate::core::types::{AnalysisType, UnderscoreLayout};
use crate::parsing::hits::ParseError;
use crate::parsing::identifier::parse_identifier;
use crate::report::rows::{GdcsRow, ReportRow, ResistanceRow, VirulenceRow};
use crate::report::writer::report_file_name;
use crate::resolving::best_call::resolve;
use crate::resolving::tally::{CoreTally, Ratio};

/// Analyses whose reports can be restored
pub const RESUMABLE: [AnalysisType; 3] = [
    AnalysisType::Gdcs,
    AnalysisType::Resfinder,
    AnalysisType::Virulence,
];

fn reader<R: Read>(input: R, header: &[&str]) -> Result<csv::Reader<R>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let found: Vec<&str> = rdr.headers()?.iter().collect();
    let expected = header.iter().copied();
    // A trailing empty header cell is accepted
    let found_trimmed = found.strip_suffix(&[""]).unwrap_or(&found);
    if !found_trimmed.iter().copied().eq(expected) {
        return Err(ParseError::InvalidFormat(format!(
            "Unexpected report header: {}",
            found.join(",")
        )));
    }
    Ok(rdr)
}

/// Rows grouped by sample, with blank strain cells carried forward
fn rows_by_sample<R: Read>(
    input: R,
    header: &[&str],
) -> Result<Vec<(String, Option<csv::StringRecord>)>, ParseError> {
    let mut rdr = reader(input, header)?;
    let mut rows = Vec::new();
    let mut current: Option<String> = None;

    for record in rdr.records() {
        let record = record?;
        let strain = match record.get(0) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => match &current {
                Some(s) => s.clone(),
                None => continue,
            },
        };
        current = Some(strain.clone());

        if record.len() == 1 {
            rows.push((strain, None));
        } else if record.len() == header.len()
            || (record.len() == header.len() + 1 && record.get(header.len()) == Some(""))
        {
            rows.push((strain, Some(record)));
        } else {
            tracing::debug!(
                "Skipping report row for {strain} with {} columns",
                record.len()
            );
        }
    }
    Ok(rows)
}

/// Parse a GDCS report into per-sample tallies.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for an unexpected header or a cell
/// that is not a `present/total` ratio.
pub fn parse_gdcs_report<R: Read>(input: R) -> Result<HashMap<String, CoreTally>, ParseError> {
    let mut tallies = HashMap::new();

    for (strain, record) in rows_by_sample(input, GdcsRow::HEADER)? {
        let Some(record) = record else {
            continue;
        };
        let ratio = |i: usize| -> Result<Ratio, ParseError> {
            record
                .get(i)
                .unwrap_or_default()
                .parse::<Ratio>()
                .map_err(|e| ParseError::InvalidFormat(e.to_string()))
        };
        let tally = CoreTally {
            core: ratio(2)?,
            mlst: ratio(3)?,
            rmlst: ratio(4)?,
            cgmlst: ratio(5)?,
        };
        tallies.insert(strain, tally);
    }

    Ok(tallies)
}

fn number(record: &csv::StringRecord, i: usize) -> Option<f64> {
    record.get(i)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn restored_hit(gene: &str, allele: &str, accession: &str, identity: f64) -> Option<HitRecord> {
    let target = format!("{gene}:{allele}:{accession}");
    let parts = parse_identifier(&target, UnderscoreLayout::AlleleAccession).ok()?;
    Some(HitRecord::from_parts(target, parts, identity))
}

/// Parse a ResFinder report into per-sample hits. Samples listed without
/// hits map to an empty list.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for an unexpected header.
pub fn parse_resistance_report<R: Read>(
    input: R,
) -> Result<HashMap<String, Vec<HitRecord>>, ParseError> {
    let mut hits: HashMap<String, Vec<HitRecord>> = HashMap::new();

    for (strain, record) in rows_by_sample(input, ResistanceRow::HEADER)? {
        let entry = hits.entry(strain).or_default();
        let Some(record) = record else {
            continue;
        };
        let (Some(gene), Some(allele), Some(accession)) =
            (record.get(2), record.get(3), record.get(4))
        else {
            continue;
        };
        let Some(identity) = number(&record, 5) else {
            continue;
        };
        let Some(mut hit) = restored_hit(gene, allele, accession, identity) else {
            continue;
        };
        if let Some(length) = record.get(6).and_then(|l| l.parse::<u64>().ok()) {
            hit.start = 1;
            hit.end = length;
        }
        entry.push(hit.with_depth(number(&record, 7).unwrap_or_default()));
    }

    Ok(hits)
}

/// Parse a virulence report into per-sample hits. The Subtype/Allele column
/// is restored as the allele.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for an unexpected header.
pub fn parse_virulence_report<R: Read>(
    input: R,
) -> Result<HashMap<String, Vec<HitRecord>>, ParseError> {
    let mut hits: HashMap<String, Vec<HitRecord>> = HashMap::new();

    for (strain, record) in rows_by_sample(input, VirulenceRow::HEADER)? {
        let entry = hits.entry(strain).or_default();
        let Some(record) = record else {
            continue;
        };
        let (Some(gene), Some(allele), Some(accession)) =
            (record.get(1), record.get(2), record.get(4))
        else {
            continue;
        };
        let Some(identity) = number(&record, 5) else {
            continue;
        };
        if let Some(hit) = restored_hit(gene, allele, accession, identity) {
            entry.push(hit.with_depth(number(&record, 6).unwrap_or_default()));
        }
    }

    Ok(hits)
}

fn parse_report_file(
    path: &Path,
    analysis: AnalysisType,
) -> Result<HashMap<String, AnalysisResult>, ParseError> {
    let file = std::fs::File::open(path)?;
    let results = match analysis {
        AnalysisType::Gdcs => parse_gdcs_report(file)?
            .into_iter()
            .map(|(strain, tally)| (strain, AnalysisResult::Gdcs(tally)))
            .collect(),
        AnalysisType::Resfinder => parse_resistance_report(file)?
            .into_iter()
            .map(|(strain, hits)| (strain, AnalysisResult::Genes(resolve(hits))))
            .collect(),
        AnalysisType::Virulence => parse_virulence_report(file)?
            .into_iter()
            .map(|(strain, hits)| (strain, AnalysisResult::Genes(resolve(hits))))
            .collect(),
        other => {
            return Err(ParseError::InvalidFormat(format!(
                "No resumable report for {other}"
            )))
        }
    };
    Ok(results)
}

/// Restore results from reports found in `dir` into matching samples.
///
/// Missing reports are ignored. Unreadable reports are reported to `sink` and
/// left for the engine to recompute. Returns the number of sample results
/// restored.
pub fn restore_prior_reports(dir: &Path, samples: &mut [Sample], sink: &dyn EventSink) -> usize {
    let mut restored = 0;

    for analysis in RESUMABLE {
        let Some(name) = report_file_name(analysis) else {
            continue;
        };
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }

        let mut results = match parse_report_file(&path, analysis) {
            Ok(results) => results,
            Err(e) => {
                sink.emit(ResolutionEvent::PriorReportUnreadable {
                    analysis,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        for sample in samples.iter_mut() {
            if let Some(result) = results.remove(&sample.name) {
                sample.results.insert(analysis, result);
                restored += 1;
            }
        }
    }

    restored
}
