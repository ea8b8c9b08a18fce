use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Why a raw record was dropped by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("id is missing or not an integer")]
    InvalidId,

    #[error("status is missing or not an integer")]
    InvalidStatus,

    #[error("created_at is missing, empty or not a string")]
    MissingTimestamp,

    #[error("created_at is not a valid calendar date: {0:?}")]
    InvalidTimestamp(String),

    #[error("record could not be read: {0}")]
    Unreadable(String),
}

impl RecordRejection {
    /// Stable short code, used to bucket warnings.
    pub fn code(&self) -> &'static str {
        match self {
            RecordRejection::InvalidId => "invalid_id",
            RecordRejection::InvalidStatus => "invalid_status",
            RecordRejection::MissingTimestamp => "missing_timestamp",
            RecordRejection::InvalidTimestamp(_) => "invalid_timestamp",
            RecordRejection::Unreadable(_) => "unreadable",
        }
    }
}
