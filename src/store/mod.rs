// src/store/mod.rs

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{
    group::{Group, GroupType, GroupUpdate, NewGroup},
    password_reset::PasswordReset,
    session::Session,
    user::User,
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Column sets the groups table is indexed on. Lookups by team, by type and by
/// (team, type) are all served from these.
pub const GROUP_INDEXES: &[&[&str]] = &[&["team_id"], &["group_type"], &["team_id", "group_type"]];

/// Storage boundary for groups.
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn create(&self, group: NewGroup) -> Result<Group, AppError>;

    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, AppError>;

    /// All groups of a team, optionally narrowed to one type, oldest first.
    async fn find_by_team(
        &self,
        team_id: &str,
        group_type: Option<GroupType>,
    ) -> Result<Vec<Group>, AppError>;

    /// Applies the update and returns the stored result. Unknown ids give a
    /// not-found error.
    async fn update(&self, group_id: &str, update: &GroupUpdate) -> Result<Group, AppError>;
}

/// Storage boundary for users, their sessions and password reset tokens.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user(&self, user: User) -> Result<(), AppError>;

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, user_email: &str) -> Result<Option<User>, AppError>;

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<(), AppError>;

    /// Stores the session, replacing any earlier session of the same user.
    async fn save_session(&self, session: Session) -> Result<(), AppError>;

    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, AppError>;

    async fn delete_session(&self, session_id: &str) -> Result<(), AppError>;

    async fn delete_user_sessions(&self, user_id: &str) -> Result<(), AppError>;

    async fn save_password_reset(&self, reset: PasswordReset) -> Result<(), AppError>;

    /// Removes the token and returns it. Only one of several concurrent
    /// callers for the same token gets `Some`.
    async fn take_password_reset(&self, token: &str) -> Result<Option<PasswordReset>, AppError>;
}

pub(crate) fn group_not_found() -> AppError {
    AppError::not_found(Some("Group not found"))
}

pub(crate) fn user_exists() -> AppError {
    AppError::validation(Some("User already exists"))
}
