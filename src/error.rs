use thiserror::Error;

/// Main error type for ragbench
#[derive(Error, Debug)]
pub enum RagbenchError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metric spec names a kind the evaluator does not know
    #[error("Unsupported metric: {0}")]
    UnsupportedMetric(String),

    /// Metric spec has a malformed cutoff (`@` not followed by a positive integer)
    #[error("Invalid metric spec: {0}")]
    MetricParse(String),

    /// Score map contains a candidate id outside the universe
    #[error("Candidate id {0} is not in the candidate universe")]
    OutOfRangeCandidate(u32),

    /// Embedding table or query embedding errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using RagbenchError
pub type Result<T> = std::result::Result<T, RagbenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RagbenchError::UnsupportedMetric("foo@3".to_string());
        assert!(err.to_string().contains("Unsupported metric"));
        assert!(err.to_string().contains("foo@3"));
    }

    #[test]
    fn test_error_out_of_range_names_id() {
        let err = RagbenchError::OutOfRangeCandidate(42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RagbenchError = io_err.into();
        assert!(matches!(err, RagbenchError::Io(_)));
    }
}
