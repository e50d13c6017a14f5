use serde::{Deserialize, Serialize};

use crate::models::group::{Group, GroupType};

#[derive(Deserialize)]
pub struct StatsQuery {
    pub team_id: Option<String>,
}

/// One figure shown on a dashboard card.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: usize,
}

impl StatCard {
    fn new(title: &str, value: usize) -> Self {
        StatCard {
            title: title.to_string(),
            value,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub team_id: String,
    pub cards: Vec<StatCard>,
}

pub fn group_stat_cards(groups: &[Group]) -> Vec<StatCard> {
    let count_type = |group_type: GroupType| groups.iter().filter(|g| g.group_type == group_type).count();
    vec![
        StatCard::new("Total groups", groups.len()),
        StatCard::new("Active groups", groups.iter().filter(|g| g.active).count()),
        StatCard::new("Interviewer groups", count_type(GroupType::Interviewer)),
        StatCard::new("Candidate groups", count_type(GroupType::Candidate)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn group(group_type: GroupType, active: bool) -> Group {
        Group {
            id: uuid::Uuid::new_v4().to_string(),
            name: "g".into(),
            team_id: "team-1".into(),
            group_type,
            description: None,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn counts_groups_per_card() {
        let groups = vec![
            group(GroupType::Interviewer, true),
            group(GroupType::Interviewer, false),
            group(GroupType::Candidate, true),
        ];

        let cards = group_stat_cards(&groups);
        assert_eq!(
            cards,
            vec![
                StatCard::new("Total groups", 3),
                StatCard::new("Active groups", 2),
                StatCard::new("Interviewer groups", 2),
                StatCard::new("Candidate groups", 1),
            ]
        );
    }

    #[test]
    fn empty_team_has_zero_cards() {
        assert!(group_stat_cards(&[]).iter().all(|card| card.value == 0));
    }
}
