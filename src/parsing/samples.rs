use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::core::sample::{Sample, SchemeResult};
use crate::core::types::AnalysisType;
use crate::parsing::hits::{HitTable, ParseError};
use crate::utils::validation::validate_sample_name;

/// Per-sample run metadata: genus assignments and allele-typing results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleMetadata {
    pub name: String,
    #[serde(default)]
    pub closest_refseq_genus: Option<String>,
    #[serde(default)]
    pub reference_genus: Option<String>,
    #[serde(default)]
    pub schemes: BTreeMap<AnalysisType, SchemeResult>,
}

/// Parse sample metadata from a JSON array.
///
/// # Errors
///
/// Returns `ParseError::Json` on invalid JSON, or `ParseError::InvalidFormat`
/// for a bad sample name, a duplicated sample, or a scheme entry keyed by an
/// analysis that is not a typing scheme.
pub fn parse_sample_metadata(json: &str) -> Result<Vec<SampleMetadata>, ParseError> {
    let samples: Vec<SampleMetadata> = serde_json::from_str(json)?;

    let mut seen = std::collections::HashSet::new();
    for sample in &samples {
        validate_sample_name(&sample.name)
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
        if !seen.insert(sample.name.as_str()) {
            return Err(ParseError::InvalidFormat(format!(
                "Duplicate sample '{}'",
                sample.name
            )));
        }
        if let Some(analysis) = sample.schemes.keys().find(|a| !a.is_scheme()) {
            return Err(ParseError::InvalidFormat(format!(
                "Sample '{}' lists '{analysis}' as a typing scheme",
                sample.name
            )));
        }
    }

    Ok(samples)
}

/// Load sample metadata from a JSON file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the errors of
/// [`parse_sample_metadata`].
pub fn load_sample_metadata(path: &Path) -> Result<Vec<SampleMetadata>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_sample_metadata(&content)
}

/// Combine metadata and hits into samples.
///
/// Samples appear in metadata order, followed by samples only present in the
/// hit table in the order they were first seen. Hits keep their table order
/// within each sample and analysis.
#[must_use]
pub fn assemble_samples(metadata: Vec<SampleMetadata>, table: HitTable) -> Vec<Sample> {
    let mut samples: Vec<Sample> = Vec::with_capacity(metadata.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for meta in metadata {
        index.insert(meta.name.clone(), samples.len());
        samples.push(Sample {
            name: meta.name,
            closest_refseq_genus: meta.closest_refseq_genus,
            reference_genus: meta.reference_genus,
            schemes: meta.schemes,
            ..Sample::default()
        });
    }

    for entry in table.hits {
        let slot = *index.entry(entry.sample.clone()).or_insert_with(|| {
            samples.push(Sample::new(entry.sample.clone()));
            samples.len() - 1
        });
        samples[slot].add_hit(entry.analysis, entry.hit);
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hit::RawHit;
    use crate::core::types::MismatchCall;
    use crate::parsing::hits::SampleHit;

    const METADATA: &str = r#"[
        {
            "name": "2014-SEQ-0276",
            "closest_refseq_genus": "Escherichia",
            "schemes": {
                "mlst": {
                    "genes": ["adk", "fumC", "gyrB", "icd", "mdh", "purA", "recA"],
                    "mismatches": [{"gene": "adk", "call": "NA (N)"}]
                }
            }
        },
        {"name": "2014-SEQ-0277", "reference_genus": "Listeria"}
    ]"#;

    fn hit(sample: &str, analysis: AnalysisType, target: &str) -> SampleHit {
        SampleHit {
            sample: sample.to_string(),
            analysis,
            hit: RawHit::new(target, "99.0"),
        }
    }

    #[test]
    fn test_parse_sample_metadata() {
        let samples = parse_sample_metadata(METADATA).unwrap();
        assert_eq!(samples.len(), 2);
        let mlst = &samples[0].schemes[&AnalysisType::Mlst];
        assert_eq!(mlst.genes.len(), 7);
        assert_eq!(mlst.mismatches[0].call, MismatchCall::AbsentFromGenome);
        assert_eq!(samples[1].reference_genus.as_deref(), Some("Listeria"));
    }

    #[test]
    fn test_rejects_non_scheme_key() {
        let json = r#"[{"name": "s1", "schemes": {"resfinder": {}}}]"#;
        let err = parse_sample_metadata(json).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_duplicate_sample() {
        let json = r#"[{"name": "s1"}, {"name": "s1"}]"#;
        assert!(parse_sample_metadata(json).is_err());
    }

    #[test]
    fn test_assemble_samples_order() {
        let metadata = parse_sample_metadata(METADATA).unwrap();
        let table = HitTable {
            hits: vec![
                hit("2014-SEQ-0300", AnalysisType::Resfinder, "sul1_1_AY224185"),
                hit("2014-SEQ-0277", AnalysisType::Virulence, "eae:1:AF081182"),
                hit("2014-SEQ-0300", AnalysisType::Resfinder, "sul1_2_CP002151"),
            ],
            rejected: Vec::new(),
        };

        let samples = assemble_samples(metadata, table);
        let names: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["2014-SEQ-0276", "2014-SEQ-0277", "2014-SEQ-0300"]);

        assert_eq!(samples[0].genus(), "Escherichia");
        assert_eq!(samples[1].genus(), "Listeria");
        assert_eq!(samples[2].genus(), "ND");

        let resfinder = samples[2].raw_hits(AnalysisType::Resfinder);
        assert_eq!(resfinder.len(), 2);
        assert_eq!(resfinder[1].target, "sul1_2_CP002151");
    }
}
