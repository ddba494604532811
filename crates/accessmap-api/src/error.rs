use accessmap_core::error::AccessMapError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AccessMapError> for ApiError {
    fn from(err: AccessMapError) -> Self {
        let details = err.to_string();
        let api_error = match err {
            AccessMapError::InvalidCoordinate { .. } => Self::bad_request("Invalid coordinate"),
            AccessMapError::InvalidRadius { .. } => Self::bad_request("Invalid radius"),
            AccessMapError::InvalidVotes { .. } => Self::bad_request("Invalid vote tally"),
            AccessMapError::InvalidState { .. } => {
                Self::conflict("Operation not allowed in current session state")
            }
            AccessMapError::OutOfOrderSample { .. } => Self::conflict("Sample out of order"),
            AccessMapError::SessionAlreadyActive { .. } => {
                Self::conflict("Owner already has an active session")
            }
            AccessMapError::SessionNotFound { .. } => Self::not_found("Session not found"),
            _ => {
                tracing::error!(error = %details, "Unexpected engine error");
                Self::internal("Internal error")
            }
        };
        api_error.with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessmap_core::models::SessionId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AccessMapError::InvalidRadius { radius: 0.0, reason: "zero".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                AccessMapError::SessionNotFound { session_id: SessionId::new() },
                StatusCode::NOT_FOUND,
            ),
            (
                AccessMapError::InvalidState {
                    session_id: SessionId::new(),
                    state: "paused".into(),
                    operation: "pause".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AccessMapError::ConfigMissing { key: "port".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert!(api.details.is_some());
        }
    }
}
