use actix_web::HttpRequest;
use chrono::Utc;
use log::info;

use crate::errors::AppError;
use crate::models::{role::Role, user::User};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_id";

pub fn session_id(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

/// Resolves the signed-in user from the session cookie. Expired sessions are
/// removed on sight.
pub async fn current_user(req: &HttpRequest, state: &AppState) -> Result<User, AppError> {
    let session_id = session_id(req).ok_or_else(|| AppError::authentication(Some("Session ID not found")))?;

    let session = match state.accounts.find_session(&session_id).await? {
        Some(session) => session,
        None => {
            info!("Invalid session ID: {}", session_id);
            return Err(AppError::authentication(Some("Invalid session ID")));
        }
    };

    if session.is_expired(Utc::now()) {
        state.accounts.delete_session(&session_id).await?;
        info!("Session expired for session ID: {}", session_id);
        return Err(AppError::authentication(Some("Login is needed, session expired")));
    }

    state
        .accounts
        .find_user_by_id(&session.user_id)
        .await?
        .ok_or_else(|| AppError::authentication(Some("Invalid session ID")))
}

pub fn require_admin(user: &User) -> Result<(), AppError> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        info!("User {} is not an admin", user.user_name);
        Err(AppError::authorization(None))
    }
}
