use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Errors returned by the HTTP handlers.
///
/// Provider failures never show up here: the orchestrator turns them into an
/// apology reply.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    EmptyInput { message: &'static str },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Too many requests")]
    RateLimited { retry_after_secs: u64 },

    #[error("Service temporarily unavailable")]
    Unavailable(#[from] anyhow::Error),
}

impl ApiError {
    pub fn empty_message() -> Self {
        Self::EmptyInput {
            message: "Empty message",
        }
    }

    pub fn empty_voice_input() -> Self {
        Self::EmptyInput {
            message: "Empty voice input",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyInput { .. } | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Unavailable(e) = &self {
            error!("Request failed: {:?}", e);
        }

        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        let mut response = (status, body).into_response();

        if let Self::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::empty_message().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidBody("expected value".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RateLimited { retry_after_secs: 3 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk full")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_unavailable_hides_details() {
        let err = ApiError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "Service temporarily unavailable");
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited { retry_after_secs: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "42");
    }
}
