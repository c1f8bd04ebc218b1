use thiserror::Error;

pub type Result<T> = std::result::Result<T, QcError>;

#[derive(Error, Debug)]
pub enum QcError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Journal serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parameter validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("No series found for {variable} at station {station}")]
    SeriesNotFound { variable: String, station: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Reviewer prompt error: {0}")]
    Prompt(String),
}
