use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::core::types::NOT_DETERMINED;

/// Target id -> description, taken from the header lines of a target FASTA.
///
/// `>gnl|uv|X66730.1:1-2687-49 B.bronchiseptica plasmid pBBR1 genes` maps
/// `gnl|uv|X66730.1:1-2687-49` to the text after the first whitespace.
/// Commas become `;` so descriptions survive comma-separated reports.
#[derive(Debug, Default, Clone)]
pub struct TargetDescriptions {
    entries: HashMap<String, String>,
}

impl TargetDescriptions {
    /// Scan FASTA text for header lines. Sequence lines are skipped and a
    /// header without a description is not recorded.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the reader fails.
    pub fn from_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut entries = HashMap::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let Some(header) = line.strip_prefix('>') else {
                continue;
            };
            let Some((id, description)) = header.trim().split_once(char::is_whitespace) else {
                continue;
            };
            let description = description.trim();
            if description.is_empty() {
                continue;
            }
            entries.insert(id.to_string(), description.replace(',', ";"));
        }
        Ok(Self { entries })
    }

    /// Load a FASTA file, gzip-compressed when the name ends in `.gz`
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or read.
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        if path.to_string_lossy().to_lowercase().ends_with(".gz") {
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }

    /// Description of `target`, or `ND`
    #[must_use]
    pub fn describe(&self, target: &str) -> &str {
        self.entries.get(target).map_or(NOT_DETERMINED, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
