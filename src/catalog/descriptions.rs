use std::collections::HashMap;
use std::path::Path;

use crate::core::types::NOT_DETERMINED;

/// Gene -> free-text annotation, read from a `notes.txt` style file.
///
/// Each non-comment line is `gene:description:` with one to three colons,
/// e.g. `stx1Aa:  Shiga toxin 1, subunit A, variant a:`. Descriptions have
/// `", "` replaced by `_` so they survive comma-separated reports.
#[derive(Debug, Default, Clone)]
pub struct GeneDescriptions {
    entries: HashMap<String, String>,
}

impl GeneDescriptions {
    /// Parse notes text. Comment lines (`#`) and lines without a
    /// description field are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();

        for line in text.lines() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(':').collect();
            if !(2..=4).contains(&fields.len()) {
                continue;
            }
            let gene = fields[0].trim();
            if gene.is_empty() {
                continue;
            }
            let description = fields[1].replace(", ", "_").trim().to_string();
            entries.insert(gene.to_string(), description);
        }

        Self { entries }
    }

    /// Load a notes file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    #[must_use]
    pub fn get(&self, gene: &str) -> Option<&str> {
        self.entries.get(gene).map(String::as_str)
    }

    /// Description of `gene`, or `ND`
    #[must_use]
    pub fn describe(&self, gene: &str) -> &str {
        self.get(gene).unwrap_or(NOT_DETERMINED)
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

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "# Virulence notes\n\
stx1Aa:  Shiga toxin 1, subunit A, variant a:\n\
eae: intimin\n\
icaC:intercellular adhesion protein C::\n\
broken\n\
too:many:colon:separated:fields:here\n";

    #[test]
    fn test_parse_notes() {
        let notes = GeneDescriptions::parse(NOTES);
        assert_eq!(notes.len(), 3);
        assert_eq!(
            notes.get("stx1Aa"),
            Some("Shiga toxin 1_subunit A_variant a")
        );
        assert_eq!(notes.get("eae"), Some("intimin"));
        assert_eq!(notes.get("icaC"), Some("intercellular adhesion protein C"));
    }

    #[test]
    fn test_describe_missing() {
        let notes = GeneDescriptions::parse(NOTES);
        assert_eq!(notes.describe("aggR"), "ND");
        assert!(notes.get("# Virulence notes").is_none());
    }
}
