use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for CalcError {
    fn from(e: serde_yaml::Error) -> Self {
        CalcError::SerializationError(e.to_string())
    }
}
