use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::hit::RawHit;
use crate::core::types::{AnalysisType, MismatchCall, NOT_DETERMINED};
use crate::resolving::best_call::BestCalls;
use crate::resolving::tally::CoreTally;
use crate::resolving::verotoxin::VerotoxinProfile;

/// A scheme gene whose allele call did not match the sequence type profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub gene: String,
    pub call: MismatchCall,
}

/// A sample's allele-typing result for one scheme (MLST, rMLST or cgMLST)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeResult {
    /// Scheme genes with a combined result for this sample
    #[serde(default)]
    pub genes: Vec<String>,

    /// Mismatches to the sequence type, in the order the typer reported them
    #[serde(default)]
    pub mismatches: Vec<Mismatch>,
}

/// Resolved result of one analysis for one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    /// Multi-valued gene presence calls (ResFinder, virulence, prophages)
    Genes(BestCalls),

    /// Verotoxin subtyping
    Verotoxin(VerotoxinProfile),

    /// Core-genome completeness
    Gdcs(CoreTally),
}

/// One biological specimen and everything resolved for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,

    /// Genus of the closest RefSeq genome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_refseq_genus: Option<String>,

    /// Genus supplied with the run metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_genus: Option<String>,

    /// Raw hits per analysis, in input order
    #[serde(default)]
    pub hits: BTreeMap<AnalysisType, Vec<RawHit>>,

    /// Allele-typing results per scheme
    #[serde(default)]
    pub schemes: BTreeMap<AnalysisType, SchemeResult>,

    /// Resolved results per analysis
    #[serde(default)]
    pub results: BTreeMap<AnalysisType, AnalysisResult>,

    /// `{gene} ({identity}%) {class}` per ResFinder call, for run summaries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resistance_summary: Vec<String>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_genus(mut self, genus: impl Into<String>) -> Self {
        self.closest_refseq_genus = Some(genus.into());
        self
    }

    /// Genus used for catalogue lookups and reports: the closest RefSeq
    /// genus, then the reference genus, then `ND`
    #[must_use]
    pub fn genus(&self) -> &str {
        self.closest_refseq_genus
            .as_deref()
            .or(self.reference_genus.as_deref())
            .unwrap_or(NOT_DETERMINED)
    }

    pub fn add_hit(&mut self, analysis: AnalysisType, hit: RawHit) {
        self.hits.entry(analysis).or_default().push(hit);
    }

    #[must_use]
    pub fn raw_hits(&self, analysis: AnalysisType) -> &[RawHit] {
        self.hits.get(&analysis).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn gene_calls(&self, analysis: AnalysisType) -> Option<&BestCalls> {
        match self.results.get(&analysis) {
            Some(AnalysisResult::Genes(calls)) => Some(calls),
            _ => None,
        }
    }

    #[must_use]
    pub fn verotoxin(&self) -> Option<&VerotoxinProfile> {
        match self.results.get(&AnalysisType::Verotoxin) {
            Some(AnalysisResult::Verotoxin(profile)) => Some(profile),
            _ => None,
        }
    }

    #[must_use]
    pub fn core_tally(&self) -> Option<&CoreTally> {
        match self.results.get(&AnalysisType::Gdcs) {
            Some(AnalysisResult::Gdcs(tally)) => Some(tally),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genus_fallback() {
        let mut sample = Sample::new("2014-SEQ-0276");
        assert_eq!(sample.genus(), "ND");

        sample.reference_genus = Some("Listeria".to_string());
        assert_eq!(sample.genus(), "Listeria");

        let sample = sample.with_genus("Escherichia");
        assert_eq!(sample.genus(), "Escherichia");
    }

    #[test]
    fn test_raw_hits_default_empty() {
        let mut sample = Sample::new("s1");
        assert!(sample.raw_hits(AnalysisType::Resfinder).is_empty());
        sample.add_hit(AnalysisType::Resfinder, RawHit::new("sul1_1_AY224185", "100"));
        assert_eq!(sample.raw_hits(AnalysisType::Resfinder).len(), 1);
        assert!(sample.gene_calls(AnalysisType::Resfinder).is_none());
    }

    #[test]
    fn test_scheme_result_json() {
        let json = r#"{"genes": ["adk", "fumC"], "mismatches": [{"gene": "adk", "call": "NA (N)"}]}"#;
        let result: SchemeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.genes.len(), 2);
        assert_eq!(result.mismatches[0].call, MismatchCall::AbsentFromGenome);
    }
}
