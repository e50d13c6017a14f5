use std::env;
use thiserror::Error;

// Range bcrypt accepts for its work factor
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: String, value: String },
    #[error("BCRYPT_COST must be between {min} and {max}, got {0}", min = MIN_BCRYPT_COST, max = MAX_BCRYPT_COST)]
    BcryptCostOutOfRange(u32),
    #[error("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// No URL means the in-memory store is used.
    pub database_url: Option<String>,
    pub server_address: String,
    pub max_connections: u32,
    pub bcrypt_cost: u32,
    pub admin: Option<AdminSeed>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            server_address: "0.0.0.0:8080".to_string(),
            max_connections: 5,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment (after `dotenv` has run).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let admin = match (
            lookup("ADMIN_USERNAME"),
            lookup("ADMIN_EMAIL"),
            lookup("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed { username, email, password }),
            (None, None, None) => None,
            _ => return Err(ConfigError::IncompleteAdmin),
        };

        let bcrypt_cost = parse_number(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::BcryptCostOutOfRange(bcrypt_cost));
        }

        Ok(Settings {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            server_address: lookup("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            max_connections: parse_number(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            bcrypt_cost,
            admin,
        })
    }
}

fn parse_number<F>(lookup: &F, name: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => match value.trim().parse::<u32>().ok() {
            Some(number) => Ok(number),
            None => Err(ConfigError::InvalidNumber {
                name: name.to_string(),
                value,
            }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings_from(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_values() {
        let settings = settings_from(&[
            ("DATABASE_URL", "mysql://root@localhost/interviews"),
            ("SERVER_ADDRESS", "127.0.0.1:9000"),
            ("BCRYPT_COST", "4"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_EMAIL", "root@example.com"),
            ("ADMIN_PASSWORD", "Adm1n-pass"),
        ])
        .unwrap();

        assert_eq!(settings.database_url.as_deref(), Some("mysql://root@localhost/interviews"));
        assert_eq!(settings.server_address, "127.0.0.1:9000");
        assert_eq!(settings.bcrypt_cost, 4);
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.admin.unwrap().username, "root");
    }

    #[test]
    fn rejects_bad_numbers_and_partial_admin() {
        assert_eq!(
            settings_from(&[("BCRYPT_COST", "high")]).unwrap_err(),
            ConfigError::InvalidNumber {
                name: "BCRYPT_COST".into(),
                value: "high".into()
            }
        );
        assert_eq!(
            settings_from(&[("ADMIN_USERNAME", "root")]).unwrap_err(),
            ConfigError::IncompleteAdmin
        );
    }

    #[test]
    fn bcrypt_cost_must_be_usable() {
        assert_eq!(
            settings_from(&[("BCRYPT_COST", "40")]).unwrap_err(),
            ConfigError::BcryptCostOutOfRange(40)
        );
        assert_eq!(
            settings_from(&[("BCRYPT_COST", "3")]).unwrap_err(),
            ConfigError::BcryptCostOutOfRange(3)
        );
        assert_eq!(settings_from(&[("BCRYPT_COST", "4")]).unwrap().bcrypt_cost, 4);
        assert_eq!(settings_from(&[("BCRYPT_COST", "31")]).unwrap().bcrypt_cost, 31);
    }
}
