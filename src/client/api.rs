use async_trait::async_trait;
use log::{error, info};
use thiserror::Error;

use crate::errors::ErrorResponse;
use crate::routes::auth::auth_models::ResetPasswordRequest;

pub const RESET_PASSWORD_PATH: &str = "/api-auth/reset-password";

/// A failed call. `message` holds the server's text when it sent one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or("request failed"))]
pub struct ApiFailure {
    pub message: Option<String>,
}

impl ApiFailure {
    pub fn with_message(message: &str) -> Self {
        ApiFailure {
            message: Some(message.to_string()),
        }
    }

    pub fn without_message() -> Self {
        ApiFailure { message: None }
    }
}

#[async_trait]
pub trait ResetPasswordApi: Send + Sync {
    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiFailure>;
}

pub struct HttpResetPasswordApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResetPasswordApi {
    pub fn new(base_url: &str) -> Self {
        HttpResetPasswordApi {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResetPasswordApi for HttpResetPasswordApi {
    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiFailure> {
        let url = format!("{}{}", self.base_url, RESET_PASSWORD_PATH);
        let response = self.client.post(&url).json(request).send().await.map_err(|e| {
            error!("Reset password request to {} failed: {}", url, e);
            ApiFailure::without_message()
        })?;

        if response.status().is_success() {
            info!("Password reset accepted by {}", self.base_url);
            return Ok(());
        }

        // Only a structured error body carries a message worth showing
        match response.json::<ErrorResponse>().await {
            Ok(body) => Err(ApiFailure::with_message(&body.message)),
            Err(_) => Err(ApiFailure::without_message()),
        }
    }
}
