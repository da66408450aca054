use crate::catalog::{ImportError, SubscriptionError};
use crate::config::ConfigError;
use crate::store::{LookupError, StoreError};
use crate::telemetry::TelemetryError;
use crate::weather::WeatherError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound { message: String, id: Option<String> },
    MethodNotAllowed,
    Upstream(String),
    Unavailable(String),
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(ImportError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Import(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable category string placed in the `error` field of response bodies.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "Bad Request",
            AppError::NotFound { .. } => "Not Found",
            AppError::MethodNotAllowed => "Method not allowed",
            AppError::Unavailable(_) => "Service Unavailable",
            _ => "Internal Server Error",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::BadRequest(message)
            | AppError::Upstream(message)
            | AppError::Unavailable(message) => message.clone(),
            AppError::NotFound { message, .. } => message.clone(),
            AppError::MethodNotAllowed => "This endpoint does not support that method".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
            AppError::NotFound { message, .. } => write!(f, "not found: {}", message),
            AppError::MethodNotAllowed => write!(f, "method not allowed"),
            AppError::Upstream(message) => write!(f, "upstream failure: {}", message),
            AppError::Unavailable(message) => write!(f, "service unavailable: {}", message),
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        let mut body = json!({
            "error": self.category(),
            "message": self.message(),
        });
        if let AppError::NotFound { id: Some(id), .. } = &self {
            body["id"] = json!(id);
        }

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Config(err) => Self::Config(err),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::MissingId => Self::BadRequest("destination id is required".to_string()),
            LookupError::NotFound(id) => Self::NotFound {
                message: format!("Destination '{id}' was not found"),
                id: Some(id),
            },
            LookupError::Store(err) => err.into(),
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(value: WeatherError) -> Self {
        match value {
            WeatherError::NotConfigured(err) => Self::Config(err),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl From<SubscriptionError> for AppError {
    fn from(value: SubscriptionError) -> Self {
        Self::BadRequest(value.to_string())
    }
}
