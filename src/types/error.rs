use thiserror::Error;

/// partnerdash error types
#[derive(Error, Debug)]
pub enum DashboardError {
    /// One or both input tables are unavailable
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Required column absent after header normalization
    #[error("schema error: {table} table has no `{column}` column")]
    Schema {
        table: &'static str,
        column: &'static str,
    },

    /// Malformed delimited data
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Metric lookup by name failed
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
}

impl DashboardError {
    /// Whether the caller should stop and ask for input files
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput(_))
    }
}

/// Result type alias for partnerdash
pub type Result<T> = std::result::Result<T, DashboardError>;
