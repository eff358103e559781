use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::UnderscoreLayout;
use crate::parsing::identifier::{parse_identifier, IdentifierError, IdentifierParts, Subunit};

/// Coverage values are clamped to this for display
pub const MAX_DISPLAY_COVERAGE: f64 = 100.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HitError {
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error("Invalid {field} value '{value}' for target '{target}'")]
    InvalidNumber {
        target: String,
        field: &'static str,
        value: String,
    },

    #[error("Percent identity {identity} for target '{target}' is outside 0-100")]
    IdentityOutOfRange { target: String, identity: f64 },
}

/// One hit as delivered by an external aligner, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// Target identifier from the typing database, e.g. `stx2A:63:AF500190:d`
    pub target: String,
    pub identity: String,
    #[serde(default)]
    pub coverage: String,
    #[serde(default)]
    pub depth: String,
    #[serde(default)]
    pub contig: String,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub end: u64,
}

impl RawHit {
    pub fn new(target: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            identity: identity.into(),
            ..Self::default()
        }
    }
}

/// Parsed, immutable alignment hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// The original target identifier
    pub target: String,

    #[serde(flatten)]
    pub parts: IdentifierParts,

    /// Percent identity, 0-100
    pub identity: f64,

    /// Percent of the target covered. May exceed 100 from upstream rounding;
    /// kept raw, see [`HitRecord::display_coverage`].
    pub coverage: f64,

    /// Average fold depth
    pub depth: f64,

    pub contig: String,
    pub start: u64,
    pub end: u64,
}

fn parse_number(target: &str, field: &'static str, value: &str) -> Result<f64, HitError> {
    let value = value.trim();
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| HitError::InvalidNumber {
            target: target.to_string(),
            field,
            value: value.to_string(),
        })
}

/// Parse an optional numeric column; blank cells read as zero
fn parse_optional_number(target: &str, field: &'static str, value: &str) -> Result<f64, HitError> {
    if value.trim().is_empty() {
        Ok(0.0)
    } else {
        parse_number(target, field, value)
    }
}

impl HitRecord {
    /// Parse a raw hit into a structured record.
    ///
    /// # Errors
    ///
    /// Returns `HitError::Identifier` when the target identifier is malformed,
    /// `HitError::InvalidNumber` when identity, coverage or depth fail to
    /// parse, or `HitError::IdentityOutOfRange` for identities outside 0-100.
    pub fn from_raw(raw: &RawHit, layout: UnderscoreLayout) -> Result<Self, HitError> {
        let parts = parse_identifier(&raw.target, layout)?;
        Self::with_parts(raw, parts)
    }

    /// Parse a raw hit whose target is an opaque name (prophage database ids
    /// such as `PHAGE_Entero_lambda_NC_001416`). The whole target is the gene.
    ///
    /// # Errors
    ///
    /// Returns the numeric errors of [`HitRecord::from_raw`], or
    /// `HitError::Identifier` for a blank target.
    pub fn from_raw_opaque(raw: &RawHit) -> Result<Self, HitError> {
        let parts = IdentifierParts::opaque(&raw.target)?;
        Self::with_parts(raw, parts)
    }

    fn with_parts(raw: &RawHit, parts: IdentifierParts) -> Result<Self, HitError> {
        let identity = parse_number(&raw.target, "identity", &raw.identity)?;
        if !(0.0..=100.0).contains(&identity) {
            return Err(HitError::IdentityOutOfRange {
                target: raw.target.clone(),
                identity,
            });
        }
        let coverage = parse_optional_number(&raw.target, "coverage", &raw.coverage)?;
        let depth = parse_optional_number(&raw.target, "depth", &raw.depth)?;

        Ok(Self {
            target: raw.target.trim().to_string(),
            parts,
            identity,
            coverage,
            depth,
            contig: raw.contig.clone(),
            start: raw.start,
            end: raw.end,
        })
    }

    /// Build a record directly from already-structured parts
    #[must_use]
    pub fn from_parts(target: impl Into<String>, parts: IdentifierParts, identity: f64) -> Self {
        Self {
            target: target.into(),
            parts,
            identity,
            coverage: 0.0,
            depth: 0.0,
            contig: String::new(),
            start: 0,
            end: 0,
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn gene(&self) -> &str {
        &self.parts.gene
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.parts.family
    }

    #[must_use]
    pub fn subunit(&self) -> Option<Subunit> {
        self.parts.subunit
    }

    /// Name used to look a hit up in a best-call table: `gene-allele` when
    /// the gene token has no hyphen of its own and an allele is known
    /// (`VanA_1_M97297` -> `VanA-1`), otherwise the gene token.
    ///
    /// Tables are keyed by gene token, so a qualified name resolves through
    /// the first-hyphen fallback of [`crate::resolving::best_call::BestCalls::lookup`].
    #[must_use]
    pub fn lookup_name(&self) -> String {
        match &self.parts.allele {
            Some(allele) if !self.parts.gene.contains('-') => {
                format!("{}-{allele}", self.parts.gene)
            }
            _ => self.parts.gene.clone(),
        }
    }

    /// Coverage as rendered in reports, clamped to `100.0`
    #[must_use]
    pub fn display_coverage(&self) -> String {
        if self.coverage > MAX_DISPLAY_COVERAGE {
            format!("{MAX_DISPLAY_COVERAGE:.1}")
        } else {
            format!("{}", self.coverage)
        }
    }

    /// Aligned length on the contig
    #[must_use]
    pub fn length(&self) -> u64 {
        self.end.abs_diff(self.start) + 1
    }

    /// Location rendered as `start..end`
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(target: &str, identity: &str) -> RawHit {
        RawHit {
            target: target.to_string(),
            identity: identity.to_string(),
            coverage: "100.4".to_string(),
            depth: "35.2".to_string(),
            contig: "contig_1".to_string(),
            start: 1200,
            end: 2040,
        }
    }

    #[test]
    fn test_from_raw() {
        let hit = HitRecord::from_raw(
            &raw("sul1_1_AY224185", "100.00"),
            UnderscoreLayout::AlleleAccession,
        )
        .unwrap();
        assert_eq!(hit.family(), "sul1");
        assert_eq!(hit.lookup_name(), "sul1-1");
        assert!((hit.identity - 100.0).abs() < f64::EPSILON);
        assert!((hit.coverage - 100.4).abs() < 1e-9);
        assert_eq!(hit.display_coverage(), "100.0");
        assert_eq!(hit.length(), 841);
        assert_eq!(hit.location(), "1200..2040");
    }

    #[test]
    fn test_toxin_subunit() {
        let hit = HitRecord::from_raw(
            &raw("stx2B:12:AB030484:a", "97.0"),
            UnderscoreLayout::AlleleAccession,
        )
        .unwrap();
        assert_eq!(hit.family(), "stx2");
        assert_eq!(hit.gene(), "stx2B");
        assert_eq!(hit.subunit(), Some(Subunit::B));
        assert_eq!(hit.lookup_name(), "stx2B-12");

        let versioned = HitRecord::from_raw(
            &raw("blaOXA-48_1_AY236073", "100.0"),
            UnderscoreLayout::AlleleAccession,
        )
        .unwrap();
        assert_eq!(versioned.lookup_name(), "blaOXA-48");
    }

    #[test]
    fn test_invalid_identity() {
        let err = HitRecord::from_raw(&raw("sul1_1_AY224185", "abc"), UnderscoreLayout::AlleleAccession)
            .unwrap_err();
        assert!(matches!(err, HitError::InvalidNumber { field: "identity", .. }));

        let err = HitRecord::from_raw(&raw("sul1_1_AY224185", "NaN"), UnderscoreLayout::AlleleAccession)
            .unwrap_err();
        assert!(matches!(err, HitError::InvalidNumber { .. }));

        let err = HitRecord::from_raw(&raw("sul1_1_AY224185", "101.5"), UnderscoreLayout::AlleleAccession)
            .unwrap_err();
        assert!(matches!(err, HitError::IdentityOutOfRange { .. }));
    }

    #[test]
    fn test_blank_optional_fields() {
        let hit = HitRecord::from_raw(
            &RawHit::new("sul1_1_AY224185", "99.5"),
            UnderscoreLayout::AlleleAccession,
        )
        .unwrap();
        assert!(hit.coverage.abs() < f64::EPSILON);
        assert_eq!(hit.display_coverage(), "0");
    }

    #[test]
    fn test_opaque_target() {
        let hit = HitRecord::from_raw_opaque(&raw("PHAGE_Entero_lambda_NC_001416", "99.9")).unwrap();
        assert_eq!(hit.gene(), "PHAGE_Entero_lambda_NC_001416");
        assert_eq!(hit.lookup_name(), "PHAGE_Entero_lambda_NC_001416");
        assert!(hit.parts.accession.is_none());

        let err = HitRecord::from_raw_opaque(&raw("  ", "99.9")).unwrap_err();
        assert!(matches!(err, HitError::Identifier(IdentifierError::EmptyGene(_))));
    }

    #[test]
    fn test_malformed_identifier() {
        let err = HitRecord::from_raw(&raw("garbage::::::", "99.0"), UnderscoreLayout::AlleleAccession)
            .unwrap_err();
        assert!(matches!(err, HitError::Identifier(_)));
    }
}
