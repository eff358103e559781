//! Core-genome completeness (GDCS) tallies.
//!
//! Each allele-typing scheme contributes a `present/total` ratio. The combined
//! core ratio sums MLST and rMLST only: cgMLST schemes are an order of
//! magnitude larger and would swamp the combined score, so cgMLST is reported
//! on its own.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

use crate::core::sample::SchemeResult;
use crate::core::types::{AnalysisType, MismatchCall};

/// Schemes tallied for every sample, in report column order
pub const TALLIED_SCHEMES: [AnalysisType; 3] =
    [AnalysisType::Mlst, AnalysisType::Rmlst, AnalysisType::Cgmlst];

/// Schemes summed into the combined core ratio
pub const COMBINED_SCHEMES: [AnalysisType; 2] = [AnalysisType::Mlst, AnalysisType::Rmlst];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatioError {
    #[error("Ratio '{0}' is not of the form present/total")]
    MissingSeparator(String),

    #[error("Ratio '{0}' has a non-integer component")]
    NotAnInteger(String),
}

/// Genes present out of genes expected, rendered as `present/total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub present: i64,
    pub total: i64,
}

impl Ratio {
    #[must_use]
    pub fn new(present: i64, total: i64) -> Self {
        Self { present, total }
    }
}

impl std::ops::Add for Ratio {
    type Output = Ratio;

    fn add(self, other: Ratio) -> Ratio {
        Ratio::new(self.present + other.present, self.total + other.total)
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.present, self.total)
    }
}

fn parse_component(part: &str, whole: &str) -> Result<i64, RatioError> {
    let digits = part.strip_prefix('-').unwrap_or(part);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RatioError::NotAnInteger(whole.to_string()));
    }
    part.parse()
        .map_err(|_| RatioError::NotAnInteger(whole.to_string()))
}

impl FromStr for Ratio {
    type Err = RatioError;

    /// Inverse of `Display`: exactly `integer/integer`, no whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (present, total) = s
            .split_once('/')
            .ok_or_else(|| RatioError::MissingSeparator(s.to_string()))?;
        Ok(Self::new(
            parse_component(present, s)?,
            parse_component(total, s)?,
        ))
    }
}

/// Ratios for every tallied scheme plus the combined core ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreTally {
    pub mlst: Ratio,
    pub rmlst: Ratio,
    pub cgmlst: Ratio,
    /// MLST + rMLST
    pub core: Ratio,
}

impl CoreTally {
    /// Ratio for one scheme; `None` for non-scheme analyses
    #[must_use]
    pub fn scheme(&self, scheme: AnalysisType) -> Option<Ratio> {
        match scheme {
            AnalysisType::Mlst => Some(self.mlst),
            AnalysisType::Rmlst => Some(self.rmlst),
            AnalysisType::Cgmlst => Some(self.cgmlst),
            _ => None,
        }
    }

    fn set_scheme(&mut self, scheme: AnalysisType, ratio: Ratio) {
        match scheme {
            AnalysisType::Mlst => self.mlst = ratio,
            AnalysisType::Rmlst => self.rmlst = ratio,
            AnalysisType::Cgmlst => self.cgmlst = ratio,
            _ => {}
        }
    }
}

/// Tally one scheme for one sample.
///
/// Starts from the number of expected genes that have a combined result
/// (every combined result when `expected` is `None`), then applies each
/// gene's first mismatch: absent from the genome removes the gene from both
/// counts, absent from the profile removes it from `present` only.
#[must_use]
pub fn tally_scheme(expected: Option<&HashSet<String>>, result: &SchemeResult) -> Ratio {
    let start = match expected {
        Some(expected) => result
            .genes
            .iter()
            .filter(|gene| expected.contains(gene.as_str()))
            .collect::<HashSet<_>>()
            .len(),
        None => result.genes.iter().collect::<HashSet<_>>().len(),
    };
    let start = i64::try_from(start).unwrap_or(i64::MAX);
    let mut ratio = Ratio::new(start, start);

    let mut counted: HashSet<&str> = HashSet::new();
    for mismatch in &result.mismatches {
        if !counted.insert(mismatch.gene.as_str()) {
            continue;
        }
        match mismatch.call {
            MismatchCall::AbsentFromGenome => {
                ratio.present -= 1;
                ratio.total -= 1;
            }
            MismatchCall::AbsentFromProfile(_) => ratio.present -= 1,
            MismatchCall::Present => {}
        }
    }

    ratio
}

/// Tally every scheme for a sample.
///
/// `lookup` returns the expected gene set for a scheme, and `results` the
/// sample's result for it. Schemes without a result tally `0/0`.
pub fn tally<'a, E, R>(lookup: E, results: R) -> CoreTally
where
    E: Fn(AnalysisType) -> Option<&'a HashSet<String>>,
    R: Fn(AnalysisType) -> Option<&'a SchemeResult>,
{
    let mut out = CoreTally::default();
    for scheme in TALLIED_SCHEMES {
        let ratio = results(scheme)
            .map(|result| tally_scheme(lookup(scheme), result))
            .unwrap_or_default();
        out.set_scheme(scheme, ratio);
    }
    out.core = COMBINED_SCHEMES
        .iter()
        .filter_map(|&scheme| out.scheme(scheme))
        .fold(Ratio::default(), |acc, r| acc + r);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::Mismatch;

    fn genes(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("BACT{i:06}")).collect()
    }

    fn mismatch(gene: &str, call: &str) -> Mismatch {
        Mismatch {
            gene: gene.to_string(),
            call: MismatchCall::parse(call),
        }
    }

    #[test]
    fn test_rmlst_penalties() {
        let expected: HashSet<String> = genes(53).into_iter().collect();
        let result = SchemeResult {
            genes: genes(53),
            mismatches: vec![
                mismatch("BACT000001", "NA (N)"),
                mismatch("BACT000002", "NA (X)"),
            ],
        };
        let ratio = tally_scheme(Some(&expected), &result);
        assert_eq!(ratio, Ratio::new(51, 52));
        assert_eq!(ratio.to_string(), "51/52");
    }

    #[test]
    fn test_first_mismatch_per_gene_wins() {
        let result = SchemeResult {
            genes: genes(7),
            mismatches: vec![
                mismatch("BACT000003", "NA (X)"),
                mismatch("BACT000003", "NA (N)"),
                mismatch("BACT000004", "12"),
                mismatch("BACT000004", "NA (N)"),
            ],
        };
        assert_eq!(tally_scheme(None, &result), Ratio::new(6, 7));
    }

    #[test]
    fn test_only_expected_genes_count() {
        let expected: HashSet<String> = genes(3).into_iter().collect();
        let mut extra = genes(5);
        extra.push("BACT000001".to_string());
        let result = SchemeResult {
            genes: extra,
            mismatches: Vec::new(),
        };
        assert_eq!(tally_scheme(Some(&expected), &result), Ratio::new(3, 3));
    }

    #[test]
    fn test_combined_excludes_cgmlst() {
        let mlst = SchemeResult {
            genes: genes(7),
            mismatches: vec![mismatch("BACT000001", "NA (N)")],
        };
        let rmlst = SchemeResult {
            genes: genes(53),
            mismatches: vec![mismatch("BACT000002", "NA (X)")],
        };
        let cgmlst = SchemeResult {
            genes: genes(2513),
            mismatches: Vec::new(),
        };

        let core = tally(
            |_| None,
            |scheme| match scheme {
                AnalysisType::Mlst => Some(&mlst),
                AnalysisType::Rmlst => Some(&rmlst),
                AnalysisType::Cgmlst => Some(&cgmlst),
                _ => None,
            },
        );
        assert_eq!(core.mlst, Ratio::new(6, 6));
        assert_eq!(core.rmlst, Ratio::new(52, 53));
        assert_eq!(core.cgmlst, Ratio::new(2513, 2513));
        assert_eq!(core.core, Ratio::new(58, 59));
    }

    #[test]
    fn test_missing_scheme_is_zero() {
        let core = tally(|_| None, |_| None);
        assert_eq!(core.core.to_string(), "0/0");
        assert_eq!(core.cgmlst, Ratio::default());
    }

    #[test]
    fn test_ratio_round_trip() {
        for ratio in [Ratio::new(51, 52), Ratio::new(0, 0), Ratio::new(-1, 0)] {
            assert_eq!(ratio.to_string().parse::<Ratio>().unwrap(), ratio);
        }
    }

    #[test]
    fn test_ratio_rejects_malformed() {
        assert!("51".parse::<Ratio>().is_err());
        assert!("51 /52".parse::<Ratio>().is_err());
        assert!("a/52".parse::<Ratio>().is_err());
        assert!("51/".parse::<Ratio>().is_err());
        assert!("+5/6".parse::<Ratio>().is_err());
    }
}
