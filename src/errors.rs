use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const AUTHENTICATION_ERROR: &str = "AUTHENTICATION_ERROR";
pub const AUTHORIZATION_ERROR: &str = "AUTHORIZATION_ERROR";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND_ERROR: &str = "NOT_FOUND_ERROR";
pub const SERVER_ERROR: &str = "SERVER_ERROR";

/// Every failure a handler can report. Each kind fixes its HTTP status and
/// error code; only the message varies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Server(String),
}

// JSON body sent for every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

fn message_or(message: Option<&str>, default: &str) -> String {
    match message {
        Some(message) => message.to_string(),
        None => default.to_string(),
    }
}

impl AppError {
    pub fn authentication(message: Option<&str>) -> Self {
        AppError::Authentication(message_or(message, "Authentication failed"))
    }

    pub fn authorization(message: Option<&str>) -> Self {
        AppError::Authorization(message_or(message, "You are not authorized to perform this action"))
    }

    pub fn validation(message: Option<&str>) -> Self {
        AppError::Validation(message_or(message, "Validation failed"))
    }

    pub fn not_found(message: Option<&str>) -> Self {
        AppError::NotFound(message_or(message, "Resource not found"))
    }

    pub fn server(message: Option<&str>) -> Self {
        AppError::Server(message_or(message, "Internal server error"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => AUTHENTICATION_ERROR,
            AppError::Authorization(_) => AUTHORIZATION_ERROR,
            AppError::Validation(_) => VALIDATION_ERROR,
            AppError::NotFound(_) => NOT_FOUND_ERROR,
            AppError::Server(_) => SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Authentication(message)
            | AppError::Authorization(message)
            | AppError::Validation(message)
            | AppError::NotFound(message)
            | AppError::Server(message) => message,
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.message().to_string(),
            code: self.code().to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(self.to_response_body())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        error!("Database query failed: {}", e);
        AppError::server(None)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        error!("Password hashing failed: {}", e);
        AppError::server(None)
    }
}

// Malformed request bodies get the same shape as every other error
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid request body: {}", err);
    AppError::validation(Some(&message)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn defaults_carry_fixed_status_and_code() {
        let cases = [
            (AppError::authentication(None), 401, AUTHENTICATION_ERROR, "Authentication failed"),
            (
                AppError::authorization(None),
                403,
                AUTHORIZATION_ERROR,
                "You are not authorized to perform this action",
            ),
            (AppError::validation(None), 400, VALIDATION_ERROR, "Validation failed"),
            (AppError::not_found(None), 404, NOT_FOUND_ERROR, "Resource not found"),
            (AppError::server(None), 500, SERVER_ERROR, "Internal server error"),
        ];

        for (err, status, code, message) in cases {
            assert_eq!(err.status().as_u16(), status);
            assert_eq!(err.code(), code);
            assert_eq!(err.message(), message);
        }
    }

    #[test]
    fn custom_message_keeps_status_and_code() {
        let err = AppError::not_found(Some("Group not found"));
        assert_eq!(err.message(), "Group not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), NOT_FOUND_ERROR);
        assert_eq!(err.to_string(), "Group not found");

        let err = AppError::authentication(Some("Token expired"));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), AUTHENTICATION_ERROR);
    }

    #[actix_web::test]
    async fn response_body_has_message_and_code() {
        let response = AppError::validation(Some("name is required")).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "name is required");
        assert_eq!(body.code, VALIDATION_ERROR);
    }

    #[test]
    fn row_not_found_becomes_server_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err, AppError::server(None));
    }
}
