use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use vinculo_core::error::VinculoError;
use vinculo_core::model::ValidationErrors;

pub const VALIDATION_FAILED: &str = "Falló la validación. Por favor revisa los campos.";
pub const SUGGESTION_FAILED: &str =
    "No se pudieron obtener sugerencias de la IA. Por favor, inténtalo de nuevo.";

/// JSON API error: `{"error": "...", "fields": {...}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<ValidationErrors>,
}

impl ApiError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            fields: None,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn validation(fields: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: VALIDATION_FAILED.to_string(),
            fields: Some(fields),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, msg)
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.message });
        if let Some(fields) = self.fields {
            body["fields"] = serde_json::to_value(fields).unwrap_or_default();
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(errors)
    }
}

impl From<VinculoError> for ApiError {
    fn from(err: VinculoError) -> Self {
        match err {
            VinculoError::InvalidInput(msg) => Self::bad_request(msg),
            VinculoError::Validation(fields) => Self::validation(fields),
            ref e if e.is_upstream() => {
                tracing::error!("upstream error: {}", e);
                Self::bad_gateway(SUGGESTION_FAILED)
            }
            other => {
                tracing::error!("api error: {}", other);
                Self::internal(other.to_string())
            }
        }
    }
}
