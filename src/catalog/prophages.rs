use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Prophage id -> bacterial host, from the prophage database overview table
#[derive(Debug, Default, Clone)]
pub struct ProphageHosts {
    hosts: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverviewRow {
    id_prophage: String,
    host: String,
}

impl ProphageHosts {
    /// Read a tab-separated overview with `id_prophage` and `host` columns.
    /// Extra columns are ignored; rows missing either column are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `csv::Error` if the header cannot be read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let mut hosts = HashMap::new();
        for row in rdr.deserialize::<OverviewRow>() {
            match row {
                Ok(row) => {
                    hosts.insert(row.id_prophage, row.host);
                }
                Err(e) => tracing::debug!("Skipping prophage overview row: {e}"),
            }
        }
        Ok(Self { hosts })
    }

    /// Load the overview from a file
    ///
    /// # Errors
    ///
    /// Returns a `csv::Error` if the file cannot be opened or read.
    pub fn load(path: &Path) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    #[must_use]
    pub fn host(&self, prophage: &str) -> Option<&str> {
        self.hosts.get(prophage).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
