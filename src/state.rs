use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AdminSeed;
use crate::errors::AppError;
use crate::models::{role::Role, user::User};
use crate::password::hash_password;
use crate::store::{AccountStore, GroupStore, MemoryStore};

/// Shared handler state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub groups: Arc<dyn GroupStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, bcrypt_cost: u32) -> Self
    where
        S: GroupStore + AccountStore + 'static,
    {
        AppState {
            groups: store.clone(),
            accounts: store,
            bcrypt_cost,
        }
    }

    pub fn in_memory(bcrypt_cost: u32) -> Self {
        Self::new(Arc::new(MemoryStore::new()), bcrypt_cost)
    }

    /// Creates the configured admin account unless the username is taken.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<(), AppError> {
        if self.accounts.find_user_by_name(&seed.username).await?.is_some() {
            info!("Admin account {} already exists", seed.username);
            return Ok(());
        }

        let user = User {
            user_id: Uuid::new_v4().to_string(),
            user_name: seed.username.clone(),
            user_email: seed.email.clone(),
            password_hash: hash_password(&seed.password, self.bcrypt_cost)?,
            role: Role::Admin,
        };
        self.accounts.create_user(user).await?;
        info!("Admin account {} created", seed.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_admin_is_idempotent() {
        let state = AppState::in_memory(4);
        let seed = AdminSeed {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "Adm1n-pass".into(),
        };

        state.seed_admin(&seed).await.unwrap();
        state.seed_admin(&seed).await.unwrap();

        let admin = state.accounts.find_user_by_name("root").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
