use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::services::participant_service::ParticipantError;

/// JSON API error. Bodies stay generic; the detail goes to the log only.
#[derive(Debug)]
pub struct ApiError(pub ParticipantError);

impl From<ParticipantError> for ApiError {
    fn from(err: ParticipantError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            ParticipantError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ParticipantError::DuplicateKey => StatusCode::CONFLICT,
            ParticipantError::NotFound(_) => StatusCode::NOT_FOUND,
            ParticipantError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self.0 {
            ParticipantError::InvalidArgument(_) => "Field \"count\" must be a positive number",
            ParticipantError::DuplicateKey => "Duplicate number error",
            ParticipantError::NotFound(_) => "Participant not found",
            ParticipantError::Store(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "participants api request failed");
        } else {
            warn!(status = %status, error = %self.0, "participants api request rejected");
        }
        (
            status,
            Json(serde_json::json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}
