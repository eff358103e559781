use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::core::types::AnalysisType;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Failed to read catalogue: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalogue: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Catalogue lists '{analysis}' for genus '{genus}', which is not a typing scheme")]
    NotAScheme {
        genus: String,
        analysis: AnalysisType,
    },
}

/// Catalogue version for compatibility checking
pub const CATALOGUE_VERSION: &str = "1.0.0";

/// Serializable catalogue format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueData {
    pub version: String,
    pub created_at: String,
    /// Genus -> scheme -> expected genes
    pub genera: BTreeMap<String, BTreeMap<AnalysisType, Vec<String>>>,
}

/// Expected scheme genes per genus, loaded once per run and shared read-only
#[derive(Debug, Default)]
pub struct ExpectedCatalogue {
    /// Genus -> scheme -> expected genes, in catalogue order
    pub genera: BTreeMap<String, BTreeMap<AnalysisType, Vec<String>>>,

    /// Index: (genus, scheme) -> expected gene set
    gene_sets: HashMap<(String, AnalysisType), HashSet<String>>,
}

impl ExpectedCatalogue {
    /// Create an empty catalogue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded default catalogue
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError` if the embedded JSON is invalid.
    pub fn load_embedded() -> Result<Self, CatalogueError> {
        // Validated at compile time via build.rs
        const EMBEDDED_CATALOGUE: &str = include_str!("../../catalogs/expected_genes.json");
        Self::from_json(EMBEDDED_CATALOGUE)
    }

    /// Load a catalogue from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogueError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a catalogue from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::ParseError` on invalid JSON, or
    /// `CatalogueError::NotAScheme` if a genus lists a non-scheme analysis.
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let data: CatalogueData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOGUE_VERSION {
            tracing::warn!(
                "Catalogue version mismatch (expected {}, found {})",
                CATALOGUE_VERSION,
                data.version
            );
        }

        let mut catalogue = Self::new();
        for (genus, schemes) in data.genera {
            for (scheme, genes) in schemes {
                catalogue.add_scheme(&genus, scheme, genes)?;
            }
        }

        Ok(catalogue)
    }

    /// Add or replace the expected genes of one scheme for a genus
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::NotAScheme` if `scheme` is not MLST, rMLST or
    /// cgMLST.
    pub fn add_scheme(
        &mut self,
        genus: &str,
        scheme: AnalysisType,
        genes: Vec<String>,
    ) -> Result<(), CatalogueError> {
        if !scheme.is_scheme() {
            return Err(CatalogueError::NotAScheme {
                genus: genus.to_string(),
                analysis: scheme,
            });
        }

        self.gene_sets.insert(
            (genus.to_string(), scheme),
            genes.iter().cloned().collect(),
        );
        self.genera
            .entry(genus.to_string())
            .or_default()
            .insert(scheme, genes);
        Ok(())
    }

    /// Expected gene set for a genus and scheme
    #[must_use]
    pub fn expected(&self, genus: &str, scheme: AnalysisType) -> Option<&HashSet<String>> {
        self.gene_sets.get(&(genus.to_string(), scheme))
    }

    /// Export the catalogue to JSON
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogueError> {
        let data = CatalogueData {
            version: CATALOGUE_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            genera: self.genera.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of genera in the catalogue
    #[must_use]
    pub fn len(&self) -> usize {
        self.genera.len()
    }

    /// Check if catalogue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genera.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_catalogue() {
        let catalogue = ExpectedCatalogue::load_embedded().unwrap();
        assert!(!catalogue.is_empty());

        let mlst = catalogue
            .expected("Escherichia", AnalysisType::Mlst)
            .unwrap();
        assert_eq!(mlst.len(), 7);
        assert!(mlst.contains("adk"));
    }

    #[test]
    fn test_expected_missing_genus() {
        let catalogue = ExpectedCatalogue::load_embedded().unwrap();
        assert!(catalogue.expected("Vibrio", AnalysisType::Mlst).is_none());
        assert!(catalogue
            .expected("Escherichia", AnalysisType::Resfinder)
            .is_none());
    }

    #[test]
    fn test_rejects_non_scheme() {
        let json = r#"{"version": "1.0.0", "created_at": "", "genera": {"Escherichia": {"resfinder": ["sul1"]}}}"#;
        let err = ExpectedCatalogue::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogueError::NotAScheme { .. }));
    }

    #[test]
    fn test_to_json_round_trip() {
        let mut catalogue = ExpectedCatalogue::new();
        catalogue
            .add_scheme(
                "Listeria",
                AnalysisType::Mlst,
                vec!["abcZ".to_string(), "bglA".to_string()],
            )
            .unwrap();
        let json = catalogue.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"mlst\""));

        let reloaded = ExpectedCatalogue::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.expected("Listeria", AnalysisType::Mlst).unwrap().len(),
            2
        );
    }
}
