//! Dataset loading service for CLI and TUI
//!
//! Reads the provider and services CSVs into normalized tables. Both inputs
//! are required; a missing one stops the pass with `MissingInput`.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use crate::types::{DashboardError, ProviderTable, Result, ServiceTable, Table};

/// A readable tabular source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// File on disk
    Path(PathBuf),
    /// In-memory upload, with a display name
    Buffer { name: String, bytes: Vec<u8> },
}

impl DataSource {
    pub fn buffer(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Human-readable origin for messages
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Buffer { name, .. } => name.clone(),
        }
    }
}

/// Dataset loader
pub struct DataLoaderService {
    delimiter: u8,
}

impl DataLoaderService {
    /// Create a loader for comma-separated input
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load both tables. Either source being `None` (or a path that does not
    /// exist) is a `MissingInput` error naming what is absent.
    pub fn load(
        &self,
        providers: Option<&DataSource>,
        services: Option<&DataSource>,
    ) -> Result<(ProviderTable, ServiceTable)> {
        let missing: Vec<&str> = [
            ("provider.csv", providers),
            ("services.csv", services),
        ]
        .iter()
        .filter(|(_, source)| !source.is_some_and(Self::is_available))
        .map(|(name, _)| *name)
        .collect();

        let (Some(providers), Some(services), true) = (providers, services, missing.is_empty())
        else {
            return Err(DashboardError::MissingInput(format!(
                "{} not provided; supply both provider.csv and services.csv",
                missing.join(" and ")
            )));
        };

        let provider_table = self.read_table(providers)?;
        debug!(
            source = %providers.describe(),
            rows = provider_table.len(),
            columns = provider_table.columns().len(),
            "loaded provider table"
        );
        let service_table = self.read_table(services)?;
        debug!(
            source = %services.describe(),
            rows = service_table.len(),
            columns = service_table.columns().len(),
            "loaded services table"
        );

        Ok((
            ProviderTable::new(provider_table),
            ServiceTable::new(service_table),
        ))
    }

    fn is_available(source: &DataSource) -> bool {
        match source {
            DataSource::Path(path) => path.is_file(),
            DataSource::Buffer { .. } => true,
        }
    }

    /// Parse one source into a normalized table
    pub fn read_table(&self, source: &DataSource) -> Result<Table> {
        match source {
            DataSource::Path(path) => self.parse(File::open(path)?),
            DataSource::Buffer { bytes, .. } => self.parse(bytes.as_slice()),
        }
    }

    fn parse<R: Read>(&self, reader: R) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Table::new(columns, rows))
    }
}

impl Default for DataLoaderService {
    fn default() -> Self {
        Self::new()
    }
}
