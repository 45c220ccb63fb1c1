use crate::domain::job::ApiError;
use crate::error::{ErrorCode, ServerError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: Vec<ApiError>,
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::AuthenticationAppIdInvalid | ErrorCode::AuthenticationFailed => {
            StatusCode::UNAUTHORIZED
        }
        ErrorCode::ResourceNotFound | ErrorCode::UnknownProvider => StatusCode::NOT_FOUND,
        ErrorCode::General => StatusCode::BAD_REQUEST,
        ErrorCode::ServerSide | ErrorCode::NotImplementedByTestServer => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let code = self.code();
        debug!(code = code.as_str(), error = %self, "request failed");
        let body = ErrorBody {
            errors: vec![ApiError { code }],
        };
        (status_for(code), Json(body)).into_response()
    }
}
