use actix_web::{cookie::{self, Cookie}, web, HttpRequest, HttpResponse, Responder};
use chrono::{Duration, Utc};
use log::info;
use uuid::Uuid;

use super::auth_models::{
    CheckEmailRequest, CheckEmailResponse,
    CheckUsernameRequest, CheckUsernameResponse,
    DefaultResponse,
    ForgotPasswordRequest,
    LoginRequest, LoginResponse,
    MeResponse,
    RegisterRequest,
    ResetPasswordRequest,
};
use crate::errors::AppError;
use crate::models::{
    password_reset::PasswordReset,
    role::Role,
    session::Session,
    user::User,
};
use crate::password::{check_policy, hash_password, verify_password};
use crate::routes::session::{current_user, session_id, SESSION_COOKIE};
use crate::state::AppState;

pub const PASSWORD_RESET_LIFETIME_MINUTES: i64 = 60;
pub const SESSION_LIFETIME_MINUTES: i64 = 30;
pub const PERSISTENT_SESSION_LIFETIME_DAYS: i64 = 10;

pub async fn auth_get() -> impl Responder {
    info!("Received request on /api-auth endpoint");
    HttpResponse::Ok().body("Hello, this is the interview scheduler auth endpoint.")
}

// Check if username is unique
pub async fn check_username(
    state: web::Data<AppState>,
    req: web::Json<CheckUsernameRequest>,
) -> Result<HttpResponse, AppError> {
    let username = req.username.trim();
    info!("Received request to check username: {}", username);
    let is_unique = state.accounts.find_user_by_name(username).await?.is_none();
    info!("Username {} is unique: {}", username, is_unique);
    Ok(HttpResponse::Ok().json(CheckUsernameResponse { is_unique }))
}

// Check if email is unique
pub async fn check_email(
    state: web::Data<AppState>,
    req: web::Json<CheckEmailRequest>,
) -> Result<HttpResponse, AppError> {
    let email = req.email.trim();
    info!("Received request to check email: {}", email);
    let is_unique = state.accounts.find_user_by_email(email).await?.is_none();
    info!("Email {} is unique: {}", email, is_unique);
    Ok(HttpResponse::Ok().json(CheckEmailResponse { is_unique }))
}

// register interviewer or candidate
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    info!("Received request to register user: {}", req.username);

    let username = req.username.trim();
    let email = req.email.trim();
    if username.is_empty() {
        return Err(AppError::validation(Some("username is required")));
    }
    if email.is_empty() {
        return Err(AppError::validation(Some("email is required")));
    }

    let role = match req.role.parse::<Role>() {
        Ok(Role::Admin) => {
            return Err(AppError::authorization(Some("Admin accounts cannot be self-registered")))
        }
        Ok(role) => role,
        Err(_) => return Err(AppError::validation(Some("role must be one of: interviewer, candidate"))),
    };

    check_policy(&req.password)?;

    if state.accounts.find_user_by_name(username).await?.is_some() {
        return Err(AppError::validation(Some("Username is already taken")));
    }
    if state.accounts.find_user_by_email(email).await?.is_some() {
        return Err(AppError::validation(Some("Email is already registered")));
    }

    let user = User {
        user_id: Uuid::new_v4().to_string(),
        user_name: username.to_string(),
        user_email: email.to_string(),
        password_hash: hash_password(&req.password, state.bcrypt_cost)?,
        role,
    };
    state.accounts.create_user(user).await?;

    info!("User {} registered successfully", username);
    Ok(HttpResponse::Created().json(DefaultResponse {
        success: true,
        message: "User registered successfully".into(),
    }))
}

// login logic
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let username = req.username.trim();
    info!("Received login request for user: {}", username);

    let user = match state.accounts.find_user_by_name(username).await? {
        Some(user) => user,
        None => {
            info!("Invalid username: {}", username);
            return Err(AppError::authentication(Some("Invalid username or password")));
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        info!("Invalid password for user: {}", username);
        return Err(AppError::authentication(Some("Invalid username or password")));
    }

    let new_session_id = Uuid::new_v4().to_string();
    let expires_at = if req.remember_me {
        Utc::now() + Duration::days(PERSISTENT_SESSION_LIFETIME_DAYS)
    } else {
        Utc::now() + Duration::minutes(SESSION_LIFETIME_MINUTES)
    };

    // Any earlier session of this user is replaced
    state
        .accounts
        .save_session(Session {
            session_id: new_session_id.clone(),
            user_id: user.user_id.clone(),
            expires_at,
            is_persistent: req.remember_me,
        })
        .await?;

    // Remembered logins outlive the browser session
    let mut session_cookie = Cookie::build(SESSION_COOKIE, new_session_id)
        .path("/")
        .http_only(true)
        .finish();
    if req.remember_me {
        session_cookie.set_max_age(cookie::time::Duration::days(PERSISTENT_SESSION_LIFETIME_DAYS));
    }

    info!("User {} logged in successfully", username);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie)
        .json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            role: user.role,
            role_name: user.role.display_name().into(),
            dashboard_path: user.role.dashboard_path().into(),
        }))
}

pub async fn me(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    Ok(HttpResponse::Ok().json(MeResponse {
        username: user.user_name,
        email: user.user_email,
        role: user.role,
        role_name: user.role.display_name().into(),
        dashboard_path: user.role.dashboard_path().into(),
    }))
}

pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    if let Some(session_id) = session_id(&req) {
        state.accounts.delete_session(&session_id).await?;
    }

    info!("Logout successful for user: {}", user.user_name);
    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    Ok(HttpResponse::Ok().cookie(removal).json(DefaultResponse {
        success: true,
        message: "Logout successful".into(),
    }))
}

// Issues a reset token; the answer is the same whether or not the email is known
pub async fn forgot_password(
    state: web::Data<AppState>,
    req: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let email = req.email.trim();
    info!("Received password reset request for email: {}", email);

    if let Some(user) = state.accounts.find_user_by_email(email).await? {
        let reset = PasswordReset {
            token: Uuid::new_v4().to_string(),
            user_id: user.user_id,
            expires_at: Utc::now() + Duration::minutes(PASSWORD_RESET_LIFETIME_MINUTES),
        };
        info!("Password reset token issued for user: {}", reset.user_id);
        state.accounts.save_password_reset(reset).await?;
    }

    Ok(HttpResponse::Ok().json(DefaultResponse {
        success: true,
        message: "If the email is registered, a reset link has been sent".into(),
    }))
}

pub async fn reset_password(
    state: web::Data<AppState>,
    req: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    if req.new_password != req.confirm_password {
        return Err(AppError::validation(Some("Passwords do not match")));
    }
    check_policy(&req.new_password)?;

    // Claiming removes the token, so a second submission finds nothing
    let reset = state
        .accounts
        .take_password_reset(&req.token)
        .await?
        .ok_or_else(|| AppError::not_found(Some("Reset token not found")))?;

    if reset.is_expired(Utc::now()) {
        info!("Expired reset token used for user: {}", reset.user_id);
        return Err(AppError::authentication(Some("Token expired")));
    }

    let password_hash = hash_password(&req.new_password, state.bcrypt_cost)?;
    state.accounts.update_password(&reset.user_id, &password_hash).await?;
    state.accounts.delete_user_sessions(&reset.user_id).await?;

    info!("Password reset for user: {}", reset.user_id);
    Ok(HttpResponse::Ok().json(DefaultResponse {
        success: true,
        message: "Password has been reset".into(),
    }))
}
