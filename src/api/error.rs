use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why a request failed.
///
/// Client mistakes become a 400; anything the database or the runtime throws
/// becomes a 500. Either way the body is `{"success": false, "error": ...}`
/// and the server keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No {0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Invalid user_id: {0:?}")]
    InvalidUserId(String),

    #[error("Database error in {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidBody(_) | ApiError::InvalidUserId(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store { .. } | ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::info!("Rejected request: {self}");
        }

        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
