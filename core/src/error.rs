use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Input table '{table}' is missing")]
    MissingTable { table: &'static str },

    #[error("Table '{table}' has no column '{column}'")]
    MissingData { table: &'static str, column: String },

    #[error("Stage input from '{stage}' is unavailable")]
    UpstreamSkipped { stage: &'static str },

    #[error("Deal id {deal_id} matches {count} Closed Won deals")]
    MatchAmbiguity { deal_id: String, count: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// True for errors that only take out the reports depending on one table.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            Self::MissingTable { .. } | Self::MissingData { .. } | Self::UpstreamSkipped { .. }
        )
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
