use thiserror::Error;

/// calheat error types
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// Missing or malformed configuration
    #[error("config error: {0}")]
    Config(String),

    /// A record date (`index` set) or the end date could not be read as a calendar day
    #[error("invalid date{}: {input:?}", index_suffix(.index))]
    InvalidDate { index: Option<usize>, input: String },

    /// Window length must be a positive number of days
    #[error("invalid range: numDays must be positive and within the calendar, got {0}")]
    InvalidRange(i64),

    /// Failed to parse a JSON document
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn index_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" in values[{i}]")).unwrap_or_default()
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for calheat
pub type Result<T> = std::result::Result<T, HeatmapError>;
