use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::credit::RiskCentralError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Process-level failures: startup, serving, and risk client construction.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("risk central client error: {0}")]
    RiskClient(#[from] RiskCentralError),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::RiskClient(err) => err.code(),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::RiskClient(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string(), "code": self.code() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_client_failures_render_as_bad_gateway() {
        let response =
            AppError::from(RiskCentralError::Transport("connection refused".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn configuration_failures_render_as_internal_errors() {
        let response = AppError::from(ConfigError::InvalidPort).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_names_the_failing_layer() {
        let err = AppError::from(RiskCentralError::UnexpectedStatus(503));
        assert!(err.to_string().starts_with("risk central client error"));
        assert_eq!(err.code(), "EXTERNAL_SERVICE_ERROR");
    }
}
