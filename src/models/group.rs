use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

pub const GROUP_TYPE_ERROR: &str = "type must be one of: interviewer, candidate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Interviewer,
    Candidate,
}

impl GroupType {
    pub const ALL: [GroupType; 2] = [GroupType::Interviewer, GroupType::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Interviewer => "interviewer",
            GroupType::Candidate => "candidate",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interviewer" => Ok(GroupType::Interviewer),
            "candidate" => Ok(GroupType::Candidate),
            _ => Err(AppError::validation(Some(GROUP_TYPE_ERROR))),
        }
    }
}

/// A named set of interviewers or candidates inside one team. Groups are
/// never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub team_id: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Validated input for a new group
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub name: String,
    pub team_id: String,
    pub group_type: GroupType,
    pub description: Option<String>,
    pub active: bool,
}

impl NewGroup {
    pub fn into_group(self, id: String, now: DateTime<Utc>) -> Group {
        Group {
            id,
            name: self.name,
            team_id: self.team_id,
            group_type: self.group_type,
            description: self.description,
            active: self.active,
            created_at: now,
            updated_at: now,
        }
    }
}

// Validated partial update; None leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub group_type: Option<GroupType>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl GroupUpdate {
    pub fn apply(&self, group: &mut Group, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            group.name = name.clone();
        }
        if let Some(group_type) = self.group_type {
            group.group_type = group_type;
        }
        if let Some(description) = &self.description {
            group.description = Some(description.clone());
        }
        if let Some(active) = self.active {
            group.active = active;
        }
        group.updated_at = now;
    }
}

/// Unchecked group fields as they arrive in a create request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupDraft {
    pub name: Option<String>,
    pub team_id: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl GroupDraft {
    pub fn validate(self) -> Result<NewGroup, AppError> {
        let name = required_trimmed("name", self.name)?;
        let team_id = required_trimmed("team_id", self.team_id)?;
        let group_type = match self.group_type {
            Some(group_type) if !group_type.trim().is_empty() => group_type.trim().parse()?,
            _ => return Err(missing("type")),
        };

        Ok(NewGroup {
            name,
            team_id,
            group_type,
            description: self.description,
            active: self.active.unwrap_or(true),
        })
    }
}

/// Unchecked fields of an update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupChanges {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl GroupChanges {
    pub fn validate(self) -> Result<GroupUpdate, AppError> {
        let name = match self.name {
            Some(name) => Some(required_trimmed("name", Some(name))?),
            None => None,
        };
        let group_type = match self.group_type {
            Some(group_type) => Some(group_type.trim().parse()?),
            None => None,
        };

        Ok(GroupUpdate {
            name,
            group_type,
            description: self.description,
            active: self.active,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::validation(Some(&format!("{} is required", field)))
}

fn required_trimmed(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(missing(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> GroupDraft {
        GroupDraft {
            name: Some("  Backend panel  ".into()),
            team_id: Some("team-1".into()),
            group_type: Some("interviewer".into()),
            description: None,
            active: None,
        }
    }

    #[test]
    fn valid_draft_is_trimmed_and_active_by_default() {
        let group = full_draft().validate().unwrap();
        assert_eq!(group.name, "Backend panel");
        assert_eq!(group.team_id, "team-1");
        assert_eq!(group.group_type, GroupType::Interviewer);
        assert!(group.active);
    }

    #[test]
    fn missing_fields_are_named() {
        let mut draft = full_draft();
        draft.name = None;
        assert_eq!(draft.validate().unwrap_err(), AppError::validation(Some("name is required")));

        let mut draft = full_draft();
        draft.name = Some("   ".into());
        assert_eq!(draft.validate().unwrap_err().message(), "name is required");

        let mut draft = full_draft();
        draft.team_id = None;
        assert_eq!(draft.validate().unwrap_err().message(), "team_id is required");

        let mut draft = full_draft();
        draft.group_type = None;
        assert_eq!(draft.validate().unwrap_err().message(), "type is required");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut draft = full_draft();
        draft.group_type = Some("admin".into());
        let err = draft.validate().unwrap_err();
        assert_eq!(err.code(), crate::errors::VALIDATION_ERROR);
        assert_eq!(err.message(), GROUP_TYPE_ERROR);
    }

    #[test]
    fn changes_cannot_blank_the_name() {
        let changes = GroupChanges {
            name: Some("".into()),
            ..Default::default()
        };
        assert_eq!(changes.validate().unwrap_err().message(), "name is required");

        let changes = GroupChanges {
            group_type: Some("panel".into()),
            ..Default::default()
        };
        assert_eq!(changes.validate().unwrap_err().message(), GROUP_TYPE_ERROR);
    }

    #[test]
    fn update_touches_only_given_fields() {
        let created = Utc::now();
        let mut group = full_draft().validate().unwrap().into_group("g1".into(), created);
        let later = created + chrono::Duration::seconds(5);

        let update = GroupChanges {
            active: Some(false),
            description: Some("Senior loop".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        update.apply(&mut group, later);

        assert_eq!(group.name, "Backend panel");
        assert!(!group.active);
        assert_eq!(group.description.as_deref(), Some("Senior loop"));
        assert_eq!(group.created_at, created);
        assert_eq!(group.updated_at, later);
    }
}
