use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

use crate::core::hit::RawHit;
use crate::core::types::AnalysisType;
use crate::utils::validation::{check_hit_limit, validate_sample_name};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Too many hits: {0} exceeds maximum allowed")]
    TooManyHits(usize),
}

/// Column layout of a hit table
#[derive(Debug, Deserialize)]
struct HitRow {
    sample: String,
    analysis: String,
    target: String,
    identity: String,
    #[serde(default)]
    coverage: String,
    #[serde(default)]
    depth: String,
    #[serde(default)]
    contig: String,
    #[serde(default)]
    start: Option<u64>,
    #[serde(default)]
    end: Option<u64>,
}

/// A hit attributed to a sample and analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SampleHit {
    pub sample: String,
    pub analysis: AnalysisType,
    pub hit: RawHit,
}

/// A table row that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number
    pub line: u64,
    pub sample: Option<String>,
    pub reason: String,
}

/// Hits read from a table, with the rows that were skipped
#[derive(Debug, Default)]
pub struct HitTable {
    pub hits: Vec<SampleHit>,
    pub rejected: Vec<RejectedRow>,
}

/// Read a hit table from a file. `.gz` files are decompressed, `.csv` files
/// are comma-separated, everything else is tab-separated.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, or the errors of
/// [`parse_hit_table`].
pub fn parse_hit_file(path: &Path) -> Result<HitTable, ParseError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let stem = name.strip_suffix(".gz").unwrap_or(&name);
    let delimiter = if stem.ends_with(".csv") { b',' } else { b'\t' };

    let file = std::fs::File::open(path)?;
    if name.ends_with(".gz") {
        parse_hit_table(BufReader::new(GzDecoder::new(file)), delimiter)
    } else {
        parse_hit_table(BufReader::new(file), delimiter)
    }
}

/// Read a hit table with a header row naming the columns `sample`,
/// `analysis`, `target`, `identity` and optionally `coverage`, `depth`,
/// `contig`, `start`, `end`.
///
/// Rows that fail to deserialize or name an unknown analysis are recorded in
/// [`HitTable::rejected`]; they never fail the whole table.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a required column is missing,
/// `ParseError::Csv` if the underlying reader fails part way through, or
/// `ParseError::TooManyHits` if the limit is exceeded.
pub fn parse_hit_table<R: Read>(reader: R, delimiter: u8) -> Result<HitTable, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in ["sample", "analysis", "target", "identity"] {
        if !headers.iter().any(|h| h == required) {
            return Err(ParseError::InvalidFormat(format!(
                "Missing required column '{required}'"
            )));
        }
    }

    let mut table = HitTable::default();
    let mut record = csv::StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            // A failed read (truncated gzip, I/O) ends the table, it is not a bad row
            Err(e) if e.is_io_error() => return Err(ParseError::Csv(e)),
            Err(e) => {
                table.rejected.push(RejectedRow {
                    line: e.position().map_or(0, csv::Position::line),
                    sample: None,
                    reason: e.to_string(),
                });
                continue;
            }
        }
        let line = record.position().map_or(0, csv::Position::line);

        let row: HitRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                table.rejected.push(RejectedRow {
                    line,
                    sample: record.get(0).map(str::to_string),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Err(e) = validate_sample_name(&row.sample) {
            table.rejected.push(RejectedRow {
                line,
                sample: None,
                reason: e.to_string(),
            });
            continue;
        }

        let analysis = match row.analysis.parse::<AnalysisType>() {
            Ok(analysis) => analysis,
            Err(reason) => {
                table.rejected.push(RejectedRow {
                    line,
                    sample: Some(row.sample),
                    reason,
                });
                continue;
            }
        };

        if check_hit_limit(table.hits.len()).is_some() {
            return Err(ParseError::TooManyHits(table.hits.len()));
        }

        table.hits.push(SampleHit {
            sample: row.sample,
            analysis,
            hit: RawHit {
                target: row.target,
                identity: row.identity,
                coverage: row.coverage,
                depth: row.depth,
                contig: row.contig,
                start: row.start.unwrap_or_default(),
                end: row.end.unwrap_or_default(),
            },
        });
    }

    Ok(table)
}
