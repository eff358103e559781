//! Grammar for target identifiers found in typing databases.
//!
//! Two productions are recognised, selected by whether the identifier
//! contains a `:`:
//!
//! | Production | Fields | Meaning |
//! |------------|--------|---------|
//! | colon      | 4      | `gene:allele:accession:subtype` |
//! | colon      | 3      | `gene:allele:accession` |
//! | underscore | 4      | `gene_allele_accession_subtype` |
//! | underscore | 3      | `gene_allele_accession` or `gene_accession_subtype` ([`UnderscoreLayout`]) |
//!
//! Toxin gene tokens such as `stx1Aa` are further split into the family
//! (`stx1`), the subunit (`A`) and a trailing variant (`a`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::UnderscoreLayout;

/// Marker identifying verotoxin (Shiga toxin) gene tokens
pub const TOXIN_MARKER: &str = "stx";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier '{raw}' has {found} '{delimiter}'-separated fields, expected 3 or 4")]
    FieldCount {
        raw: String,
        delimiter: char,
        found: usize,
    },

    #[error("Identifier '{0}' has an empty gene field")]
    EmptyGene(String),
}

/// Toxin subunit encoded in the gene token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subunit {
    A,
    B,
}

impl Subunit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }
}

impl std::fmt::Display for Subunit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Structured parts of a target identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierParts {
    /// Gene token as written, e.g. `stx2A`
    pub gene: String,
    /// Gene root with any toxin subunit stripped, e.g. `stx2`
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subunit: Option<Subunit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allele: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl IdentifierParts {
    /// Parts for a target that carries no field structure
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::EmptyGene` for a blank target.
    pub fn opaque(raw: &str) -> Result<Self, IdentifierError> {
        let gene = raw.trim();
        if gene.is_empty() {
            return Err(IdentifierError::EmptyGene(raw.to_string()));
        }
        Ok(Self {
            gene: gene.to_string(),
            family: gene.to_string(),
            subunit: None,
            allele: None,
            accession: None,
            subtype: None,
        })
    }
}

/// Decomposed toxin gene token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToxinToken {
    /// Family with the subunit removed, e.g. `stx2`
    pub family: String,
    /// Numeric gene group, e.g. `2`
    pub group: String,
    pub subunit: Option<Subunit>,
    /// Lowercase variant letters trailing the subunit, e.g. `a` in `stx1Aa`
    pub variant: Option<String>,
}

/// Split a toxin gene token into family, group, subunit and variant.
///
/// Returns `None` when the token does not carry the toxin marker followed by
/// a numeric group.
#[must_use]
pub fn parse_toxin_token(gene: &str) -> Option<ToxinToken> {
    let marker_end = gene.rfind(TOXIN_MARKER)? + TOXIN_MARKER.len();
    let rest = &gene[marker_end..];

    let group_len = rest.chars().take_while(char::is_ascii_digit).count();
    if group_len == 0 {
        return None;
    }
    let group = &rest[..group_len];
    let mut tail = &rest[group_len..];

    let subunit = tail.chars().next().and_then(Subunit::from_char);
    if subunit.is_some() {
        tail = &tail[1..];
    }

    Some(ToxinToken {
        family: gene[..marker_end + group_len].to_string(),
        group: group.to_string(),
        subunit,
        variant: (!tail.is_empty()).then(|| tail.to_string()),
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Parse a raw target identifier.
///
/// # Errors
///
/// Returns `IdentifierError::FieldCount` when the chosen production does not
/// yield 3 or 4 fields, or `IdentifierError::EmptyGene` when the gene field is
/// blank.
pub fn parse_identifier(
    raw: &str,
    layout: UnderscoreLayout,
) -> Result<IdentifierParts, IdentifierError> {
    let raw = raw.trim();
    let (gene, allele, accession, subtype) = if raw.contains(':') {
        colon_production(raw)?
    } else {
        underscore_production(raw, layout)?
    };

    let gene = gene.trim();
    if gene.is_empty() {
        return Err(IdentifierError::EmptyGene(raw.to_string()));
    }

    let mut subtype = subtype.and_then(non_empty);
    let (family, subunit) = match parse_toxin_token(gene) {
        Some(token) => {
            if subtype.is_none() {
                subtype = token.variant;
            }
            (token.family, token.subunit)
        }
        None => (gene.to_string(), None),
    };

    Ok(IdentifierParts {
        gene: gene.to_string(),
        family,
        subunit,
        allele: allele.and_then(non_empty),
        accession: accession.and_then(non_empty),
        subtype,
    })
}

type Fields<'a> = (&'a str, Option<&'a str>, Option<&'a str>, Option<&'a str>);

fn colon_production(raw: &str) -> Result<Fields<'_>, IdentifierError> {
    let fields: Vec<&str> = raw.split(':').collect();
    match fields[..] {
        [gene, allele, accession, subtype] => {
            Ok((gene, Some(allele), Some(accession), Some(subtype)))
        }
        [gene, allele, accession] => Ok((gene, Some(allele), Some(accession), None)),
        _ => Err(IdentifierError::FieldCount {
            raw: raw.to_string(),
            delimiter: ':',
            found: fields.len(),
        }),
    }
}

fn underscore_production(
    raw: &str,
    layout: UnderscoreLayout,
) -> Result<Fields<'_>, IdentifierError> {
    let fields: Vec<&str> = raw.split('_').collect();
    match (&fields[..], layout) {
        (&[gene, allele, accession, subtype], _) => {
            Ok((gene, Some(allele), Some(accession), Some(subtype)))
        }
        (&[gene, allele, accession], UnderscoreLayout::AlleleAccession) => {
            Ok((gene, Some(allele), Some(accession), None))
        }
        (&[gene, accession, subtype], UnderscoreLayout::AccessionSubtype) => {
            Ok((gene, None, Some(accession), Some(subtype)))
        }
        _ => Err(IdentifierError::FieldCount {
            raw: raw.to_string(),
            delimiter: '_',
            found: fields.len(),
        }),
    }
}
