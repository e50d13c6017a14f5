use serde::{Deserialize, Serialize};

use crate::models::group::Group;

#[derive(Deserialize)]
pub struct ListGroupsQuery {
    pub team_id: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<String>,
}

// list of groups
#[derive(Serialize, Deserialize)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
}
