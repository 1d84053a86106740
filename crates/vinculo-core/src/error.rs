use thiserror::Error;

use crate::model::ValidationErrors;

#[derive(Debug, Error)]
pub enum VinculoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Suggestion error: {0}")]
    Suggestion(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VinculoError {
    /// Returns `true` when the failure came from the model provider rather than
    /// from the caller or local configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::Suggestion(_) | Self::Http(_))
    }
}

impl From<ValidationErrors> for VinculoError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, VinculoError>;
