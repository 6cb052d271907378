use thiserror::Error;

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<config::ConfigError> for GuardError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for GuardError {
    fn from(err: reqwest::Error) -> Self {
        Self::AssessmentError(format!("Assessment request failed: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    #[error("Assessment error: {0}")]
    AssessmentError(String),

    #[error("Invalid assessment: {0}")]
    InvalidAssessment(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Merkle error: {0}")]
    MerkleError(String),
}

impl GuardError {
    pub fn score_out_of_range(score: f64) -> Self {
        Self::InvalidAssessment(format!(
            "Risk score {} outside of range 0.0..=10.0",
            score
        ))
    }

    pub fn vendor_mismatch(expected: &str, found: &str) -> Self {
        Self::InvalidAssessment(format!(
            "Assessment returned for vendor {}, expected {}",
            found, expected
        ))
    }

    pub fn export_line(line: usize, err: impl std::fmt::Display) -> Self {
        Self::ExportError(format!("Failed to parse block at line {}: {}", line, err))
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
