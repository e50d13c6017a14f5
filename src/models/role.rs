use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FALLBACK_DASHBOARD_PATH: &str = "/home";
pub const FALLBACK_ROLE_NAME: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Interviewer,
    Candidate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Interviewer => "interviewer",
            Role::Candidate => "candidate",
        }
    }

    /// Landing page a user of this role is sent to after signing in.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Interviewer => "/interviewer/dashboard",
            Role::Candidate => "/candidate/dashboard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Interviewer => "Interviewer",
            Role::Candidate => "Candidate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "interviewer" => Ok(Role::Interviewer),
            "candidate" => Ok(Role::Candidate),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// Lookups over raw role strings, as they arrive from a client or a stored row.
pub fn dashboard_path(role: &str) -> &'static str {
    match role.parse::<Role>() {
        Ok(role) => role.dashboard_path(),
        Err(_) => FALLBACK_DASHBOARD_PATH,
    }
}

pub fn role_name(role: &str) -> &'static str {
    match role.parse::<Role>() {
        Ok(role) => role.display_name(),
        Err(_) => FALLBACK_ROLE_NAME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_roles_to_dashboards() {
        assert_eq!(dashboard_path("admin"), "/admin/dashboard");
        assert_eq!(dashboard_path("interviewer"), "/interviewer/dashboard");
        assert_eq!(dashboard_path("candidate"), "/candidate/dashboard");
    }

    #[test]
    fn unknown_roles_fall_back() {
        for role in ["", "ADMIN", "guest", "recruiter"] {
            assert_eq!(dashboard_path(role), "/home");
            assert_eq!(role_name(role), "User");
        }
    }

    #[test]
    fn maps_roles_to_names() {
        assert_eq!(role_name("admin"), "Administrator");
        assert_eq!(role_name("interviewer"), "Interviewer");
        assert_eq!(role_name("candidate"), "Candidate");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Interviewer).unwrap(), "\"interviewer\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::Candidate.to_string(), "candidate");
    }
}
