use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{group_not_found, user_exists, AccountStore, GroupStore};
use crate::errors::AppError;
use crate::models::{
    group::{Group, GroupType, GroupUpdate, NewGroup},
    password_reset::PasswordReset,
    session::Session,
    user::User,
};

#[derive(Default)]
struct State {
    groups: HashMap<String, Group>,
    users: HashMap<String, User>,
    sessions: HashMap<String, Session>,
    password_resets: HashMap<String, PasswordReset>,
}

/// In-process store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn create(&self, group: NewGroup) -> Result<Group, AppError> {
        let group = group.into_group(Uuid::new_v4().to_string(), Utc::now());
        let mut state = self.state.write().await;
        state.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, AppError> {
        let state = self.state.read().await;
        Ok(state.groups.get(group_id).cloned())
    }

    async fn find_by_team(
        &self,
        team_id: &str,
        group_type: Option<GroupType>,
    ) -> Result<Vec<Group>, AppError> {
        let state = self.state.read().await;
        let mut groups: Vec<Group> = state
            .groups
            .values()
            .filter(|g| g.team_id == team_id)
            .filter(|g| group_type.map_or(true, |t| g.group_type == t))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn update(&self, group_id: &str, update: &GroupUpdate) -> Result<Group, AppError> {
        let mut state = self.state.write().await;
        let group = state.groups.get_mut(group_id).ok_or_else(group_not_found)?;
        update.apply(group, Utc::now());
        Ok(group.clone())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let taken = state
            .users
            .values()
            .any(|u| u.user_name == user.user_name || u.user_email == user.user_email);
        if taken || state.users.contains_key(&user.user_id) {
            return Err(user_exists());
        }
        state.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).cloned())
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.user_name == user_name).cloned())
    }

    async fn find_user_by_email(&self, user_email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.user_email == user_email).cloned())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(AppError::not_found(Some("User not found"))),
        }
    }

    async fn save_session(&self, session: Session) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.sessions.retain(|_, s| s.user_id != session.user_id);
        state.sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        let state = self.state.read().await;
        Ok(state.sessions.get(session_id).cloned())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.sessions.remove(session_id);
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn save_password_reset(&self, reset: PasswordReset) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.password_resets.insert(reset.token.clone(), reset);
        Ok(())
    }

    async fn take_password_reset(&self, token: &str) -> Result<Option<PasswordReset>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.password_resets.remove(token))
    }
}
