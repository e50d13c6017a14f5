use serde::{Deserialize, Serialize};

use crate::models::role::Role;

// Username check request and response
#[derive(Deserialize)]
pub struct CheckUsernameRequest {
    pub username: String,
}

#[derive(Serialize, Deserialize)]
pub struct CheckUsernameResponse {
    pub is_unique: bool,
}


// Email check request and response
#[derive(Deserialize)]
pub struct CheckEmailRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct CheckEmailResponse {
    pub is_unique: bool,
}


// Registration request; role is checked by the handler so admin can be refused
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize, Deserialize)]
pub struct DefaultResponse {
    pub success: bool,
    pub message: String,
}


// Login request and response
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub role: Role,
    pub role_name: String,
    pub dashboard_path: String,
}


// Current user
#[derive(Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub role_name: String,
    pub dashboard_path: String,
}


// Password reset
#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}
