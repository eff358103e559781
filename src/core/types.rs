use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Analyses whose results the engine resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Mlst,
    Rmlst,
    Cgmlst,
    Gdcs,
    Resfinder,
    Virulence,
    Verotoxin,
    Prophages,
    Univec,
    Plasmids,
}

impl AnalysisType {
    /// Lowercase name used for report files and hit tables
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mlst => "mlst",
            Self::Rmlst => "rmlst",
            Self::Cgmlst => "cgmlst",
            Self::Gdcs => "gdcs",
            Self::Resfinder => "resfinder",
            Self::Virulence => "virulence",
            Self::Verotoxin => "verotoxin",
            Self::Prophages => "prophages",
            Self::Univec => "univec",
            Self::Plasmids => "plasmids",
        }
    }

    /// Whether this is one of the allele-typing schemes tallied by GDCS
    #[must_use]
    pub fn is_scheme(&self) -> bool {
        matches!(self, Self::Mlst | Self::Rmlst | Self::Cgmlst)
    }

    /// Whether targets in this analysis' database follow the identifier
    /// grammar. Prophage, UniVec and plasmid database ids are opaque names.
    #[must_use]
    pub fn has_structured_targets(&self) -> bool {
        !matches!(self, Self::Prophages | Self::Univec | Self::Plasmids)
    }

    /// Layout of three-field underscore identifiers in this analysis' database
    #[must_use]
    pub fn underscore_layout(&self) -> UnderscoreLayout {
        match self {
            Self::Verotoxin => UnderscoreLayout::AccessionSubtype,
            _ => UnderscoreLayout::AlleleAccession,
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mlst" => Ok(Self::Mlst),
            "rmlst" => Ok(Self::Rmlst),
            "cgmlst" => Ok(Self::Cgmlst),
            "gdcs" => Ok(Self::Gdcs),
            "resfinder" | "resfinder_assembled" => Ok(Self::Resfinder),
            "virulence" => Ok(Self::Virulence),
            "verotoxin" | "vtyper" => Ok(Self::Verotoxin),
            "prophages" => Ok(Self::Prophages),
            "univec" => Ok(Self::Univec),
            "plasmids" => Ok(Self::Plasmids),
            other => Err(format!("Unknown analysis type: {other}")),
        }
    }
}

/// Meaning of the two trailing fields in a `gene_x_y` identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderscoreLayout {
    /// `gene_allele_accession`, e.g. `ARR-2_1_HQ141279`
    AlleleAccession,
    /// `gene_accession_subtype`, e.g. `stx2A_AF500190_d`
    AccessionSubtype,
}

/// Allele call recorded against a scheme gene that did not match the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum MismatchCall {
    /// Gene matched normally
    Present,
    /// `NA (N)`: gene absent from both the genome and the profile
    AbsentFromGenome,
    /// `NA (<other>)`: gene present in the genome but not matching the profile
    AbsentFromProfile(String),
}

impl MismatchCall {
    /// Parse the call string written by the allele typers
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s == "NA (N)" {
            Self::AbsentFromGenome
        } else if let Some(rest) = s.strip_prefix("NA (") {
            Self::AbsentFromProfile(rest.trim_end_matches(')').to_string())
        } else {
            Self::Present
        }
    }
}

impl From<String> for MismatchCall {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<MismatchCall> for String {
    fn from(call: MismatchCall) -> Self {
        call.to_string()
    }
}

impl std::fmt::Display for MismatchCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::AbsentFromGenome => write!(f, "NA (N)"),
            Self::AbsentFromProfile(other) => write!(f, "NA ({other})"),
        }
    }
}

/// Sentinel rendered for anything that could not be determined
pub const NOT_DETERMINED: &str = "ND";
