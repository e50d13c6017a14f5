use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use sqlx::{mysql::MySqlPool, FromRow};
use uuid::Uuid;

use super::{group_not_found, user_exists, AccountStore, GroupStore, GROUP_INDEXES};
use crate::errors::AppError;
use crate::models::{
    group::{Group, GroupType, GroupUpdate, NewGroup},
    password_reset::PasswordReset,
    role::Role,
    session::Session,
    user::User,
};

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS Users_ (
    user_id VARCHAR(36) NOT NULL PRIMARY KEY,
    user_name VARCHAR(255) NOT NULL UNIQUE,
    user_email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    user_role VARCHAR(32) NOT NULL
)";

const CREATE_SESSIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS Sessions_ (
    session_id VARCHAR(36) NOT NULL PRIMARY KEY,
    user_id VARCHAR(36) NOT NULL UNIQUE,
    expires_at DATETIME(6) NOT NULL,
    is_persistent BOOLEAN NOT NULL
)";

const CREATE_PASSWORD_RESETS_TABLE: &str = "CREATE TABLE IF NOT EXISTS PasswordResets_ (
    token VARCHAR(36) NOT NULL PRIMARY KEY,
    user_id VARCHAR(36) NOT NULL,
    expires_at DATETIME(6) NOT NULL
)";

// Absent fields bind as NULL and keep the stored value, so concurrent updates
// of different fields do not overwrite each other.
const UPDATE_GROUP: &str = "UPDATE Groups_ SET
    group_name = COALESCE(?, group_name),
    group_type = COALESCE(?, group_type),
    description = COALESCE(?, description),
    active = COALESCE(?, active),
    updated_at = ?
    WHERE group_id = ?";

/// DDL for the groups table, with one secondary index per entry of
/// `GROUP_INDEXES`.
pub fn groups_table_ddl() -> String {
    let mut columns = vec![
        "group_id VARCHAR(36) NOT NULL PRIMARY KEY".to_string(),
        "group_name VARCHAR(255) NOT NULL".to_string(),
        "team_id VARCHAR(64) NOT NULL".to_string(),
        "group_type VARCHAR(16) NOT NULL CHECK (group_type IN ('interviewer', 'candidate'))".to_string(),
        "description TEXT NULL".to_string(),
        "active BOOLEAN NOT NULL DEFAULT TRUE".to_string(),
        "created_at DATETIME(6) NOT NULL".to_string(),
        "updated_at DATETIME(6) NOT NULL".to_string(),
    ];
    for index in GROUP_INDEXES {
        columns.push(format!("INDEX idx_groups_{} ({})", index.join("_"), index.join(", ")));
    }
    format!("CREATE TABLE IF NOT EXISTS Groups_ (\n    {}\n)", columns.join(",\n    "))
}

#[derive(FromRow)]
struct GroupRow {
    group_id: String,
    group_name: String,
    team_id: String,
    group_type: String,
    description: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GroupRow> for Group {
    type Error = AppError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        let group_type = row.group_type.parse::<GroupType>().map_err(|_| {
            error!("Group {} has unknown type {}", row.group_id, row.group_type);
            AppError::server(None)
        })?;
        Ok(Group {
            id: row.group_id,
            name: row.group_name,
            team_id: row.team_id,
            group_type,
            description: row.description,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: String,
    user_name: String,
    user_email: String,
    password_hash: String,
    user_role: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.user_role.parse::<Role>().map_err(|e| {
            error!("User {} has {}", row.user_id, e);
            AppError::server(None)
        })?;
        Ok(User {
            user_id: row.user_id,
            user_name: row.user_name,
            user_email: row.user_email,
            password_hash: row.password_hash,
            role,
        })
    }
}

#[derive(FromRow)]
struct SessionRow {
    session_id: String,
    user_id: String,
    expires_at: DateTime<Utc>,
    is_persistent: bool,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            session_id: row.session_id,
            user_id: row.user_id,
            expires_at: row.expires_at,
            is_persistent: row.is_persistent,
        }
    }
}

#[derive(FromRow)]
struct PasswordResetRow {
    token: String,
    user_id: String,
    expires_at: DateTime<Utc>,
}

impl From<PasswordResetRow> for PasswordReset {
    fn from(row: PasswordResetRow) -> Self {
        PasswordReset {
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
        }
    }
}

const GROUP_COLUMNS: &str =
    "group_id, group_name, team_id, group_type, description, active, created_at, updated_at";
const USER_COLUMNS: &str = "user_id, user_name, user_email, password_hash, user_role";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlStore { pool }
    }

    /// Creates any missing tables.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let groups_table = groups_table_ddl();
        for statement in [
            CREATE_USERS_TABLE,
            CREATE_SESSIONS_TABLE,
            CREATE_PASSWORD_RESETS_TABLE,
            groups_table.as_str(),
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is ready");
        Ok(())
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM Users_ WHERE {} = ?", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl GroupStore for MySqlStore {
    async fn create(&self, group: NewGroup) -> Result<Group, AppError> {
        let group = group.into_group(Uuid::new_v4().to_string(), Utc::now());
        sqlx::query(
            "INSERT INTO Groups_ (group_id, group_name, team_id, group_type, description, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(&group.team_id)
        .bind(group.group_type.as_str())
        .bind(&group.description)
        .bind(group.active)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(group)
    }

    async fn find_by_id(&self, group_id: &str) -> Result<Option<Group>, AppError> {
        let sql = format!("SELECT {} FROM Groups_ WHERE group_id = ?", GROUP_COLUMNS);
        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Group::try_from).transpose()
    }

    async fn find_by_team(
        &self,
        team_id: &str,
        group_type: Option<GroupType>,
    ) -> Result<Vec<Group>, AppError> {
        let rows = match group_type {
            Some(group_type) => {
                let sql = format!(
                    "SELECT {} FROM Groups_ WHERE team_id = ? AND group_type = ? ORDER BY created_at, group_id",
                    GROUP_COLUMNS
                );
                sqlx::query_as::<_, GroupRow>(&sql)
                    .bind(team_id)
                    .bind(group_type.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM Groups_ WHERE team_id = ? ORDER BY created_at, group_id",
                    GROUP_COLUMNS
                );
                sqlx::query_as::<_, GroupRow>(&sql)
                    .bind(team_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.into_iter().map(Group::try_from).collect()
    }

    async fn update(&self, group_id: &str, update: &GroupUpdate) -> Result<Group, AppError> {
        sqlx::query(UPDATE_GROUP)
            .bind(&update.name)
            .bind(update.group_type.map(|t| t.as_str()))
            .bind(&update.description)
            .bind(update.active)
            .bind(Utc::now())
            .bind(group_id)
            .execute(&self.pool)
            .await?;
        self.find_by_id(group_id).await?.ok_or_else(group_not_found)
    }
}

#[async_trait]
impl AccountStore for MySqlStore {
    async fn create_user(&self, user: User) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO Users_ (user_id, user_name, user_email, password_hash, user_role) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.user_id)
        .bind(&user.user_name)
        .bind(&user.user_email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(user_exists()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("user_id", user_id).await
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("user_name", user_name).await
    }

    async fn find_user_by_email(&self, user_email: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("user_email", user_email).await
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE Users_ SET password_hash = ? WHERE user_id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(Some("User not found")));
        }
        Ok(())
    }

    async fn save_session(&self, session: Session) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO Sessions_ (session_id, user_id, expires_at, is_persistent) VALUES (?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE session_id = VALUES(session_id), expires_at = VALUES(expires_at),
             is_persistent = VALUES(is_persistent)",
        )
        .bind(&session.session_id)
        .bind(&session.user_id)
        .bind(session.expires_at)
        .bind(session.is_persistent)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT session_id, user_id, expires_at, is_persistent FROM Sessions_ WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Session::from))
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM Sessions_ WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM Sessions_ WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_password_reset(&self, reset: PasswordReset) -> Result<(), AppError> {
        sqlx::query("INSERT INTO PasswordResets_ (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&reset.token)
            .bind(&reset.user_id)
            .bind(reset.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn take_password_reset(&self, token: &str) -> Result<Option<PasswordReset>, AppError> {
        let row = sqlx::query_as::<_, PasswordResetRow>(
            "SELECT token, user_id, expires_at FROM PasswordResets_ WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        // Whoever deletes the row owns the token
        let deleted = sqlx::query("DELETE FROM PasswordResets_ WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            info!("Reset token for user {} was already claimed", row.user_id);
            return Ok(None);
        }
        Ok(Some(PasswordReset::from(row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_table_declares_every_index() {
        let ddl = groups_table_ddl();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS Groups_"));
        assert!(ddl.contains("INDEX idx_groups_team_id (team_id)"));
        assert!(ddl.contains("INDEX idx_groups_group_type (group_type)"));
        assert!(ddl.contains("INDEX idx_groups_team_id_group_type (team_id, group_type)"));
        assert!(ddl.contains("active BOOLEAN NOT NULL DEFAULT TRUE"));
    }

    #[test]
    fn group_update_only_overwrites_supplied_columns() {
        for column in ["group_name", "group_type", "description", "active"] {
            assert!(UPDATE_GROUP.contains(&format!("{0} = COALESCE(?, {0})", column)));
        }
        assert!(UPDATE_GROUP.contains("updated_at = ?"));
        assert_eq!(UPDATE_GROUP.matches('?').count(), 6);
    }
}
