use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{service} error: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Enrichment failed for {title:?}: {source}")]
    Enrichment {
        title: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an upstream error for a non-2xx response
    pub fn upstream_status(service: &'static str, status: u16, body: &str) -> Self {
        AppError::Upstream {
            service,
            status: Some(status),
            message: format!("returned status {}: {}", status, body),
        }
    }

    /// Builds an upstream error for a body that could not be decoded
    pub fn malformed(service: &'static str, detail: impl std::fmt::Display) -> Self {
        AppError::Upstream {
            service,
            status: None,
            message: format!("malformed response: {}", detail),
        }
    }

    /// HTTP status reported by the upstream service, if any
    pub fn upstream_code(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => *status,
            AppError::HttpClient(e) => e.status().map(|s| s.as_u16()),
            AppError::Enrichment { source, .. } => source.upstream_code(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::HttpClient(_) | AppError::Upstream { .. } | AppError::Enrichment { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
