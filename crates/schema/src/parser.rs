//! Resource table parser

use super::types::TableDoc;
use fortios_provider_common::{ProviderError, ResourceDefinition, Result};
use std::fs;
use std::path::Path;

/// Resource table parser
///
/// Reads one YAML field-mapping table describing a FortiOS resource.
pub struct CatalogParser {
    /// Loaded table document
    doc: TableDoc,
}

impl CatalogParser {
    /// Load a table from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = CatalogParser::from_file("resources/wanopt_peer.yaml")?;
    /// let definition = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ProviderError::Parse(format!(
                "Failed to read resource table {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a table from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let doc: TableDoc = serde_yaml::from_str(yaml)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse resource table: {}", e)))?;

        Ok(Self { doc })
    }

    /// Convert the table into the ResourceDefinition IR
    pub fn parse(&self) -> Result<ResourceDefinition> {
        super::converter::convert_table_to_definition(&self.doc)
    }

    /// Get reference to the underlying table document
    pub fn doc(&self) -> &TableDoc {
        &self.doc
    }
}
