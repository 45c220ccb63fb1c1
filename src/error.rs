use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error codes understood by the client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    AuthenticationAppIdInvalid,
    AuthenticationFailed,
    ResourceNotFound,
    General,
    ServerSide,
    UnknownProvider,
    NotImplementedByTestServer,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthenticationAppIdInvalid => "authentication_app_id_invalid",
            ErrorCode::AuthenticationFailed => "authentication_failed",
            ErrorCode::ResourceNotFound => "resource_not_found",
            ErrorCode::General => "general",
            ErrorCode::ServerSide => "server_side",
            ErrorCode::UnknownProvider => "unknown_provider",
            ErrorCode::NotImplementedByTestServer => "not_implemented_by_test_server",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServerError {
    #[error("Application id missing or not registered")]
    AppIdInvalid,
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Resource not found")]
    ResourceNotFound,
    #[error("Malformed request: {0}")]
    General(String),
    #[error("Username {0:?} is already taken")]
    DuplicateUsername(String),
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    #[error("{0} is not implemented by the test server")]
    NotImplemented(&'static str),
}

impl ServerError {
    /// The classified code reported to callers for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServerError::AppIdInvalid => ErrorCode::AuthenticationAppIdInvalid,
            ServerError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            ServerError::ResourceNotFound => ErrorCode::ResourceNotFound,
            ServerError::General(_) => ErrorCode::General,
            ServerError::DuplicateUsername(_) => ErrorCode::ServerSide,
            ServerError::UnknownProvider(_) => ErrorCode::UnknownProvider,
            ServerError::NotImplemented(_) => ErrorCode::NotImplementedByTestServer,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
