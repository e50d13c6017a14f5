use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

use super::group_models::{GroupListResponse, ListGroupsQuery};
use crate::errors::AppError;
use crate::models::group::{GroupChanges, GroupDraft, GroupType};
use crate::routes::session::{current_user, require_admin};
use crate::state::AppState;

async fn authorize_admin(req: &HttpRequest, state: &AppState) -> Result<(), AppError> {
    let user = current_user(req, state).await?;
    require_admin(&user)
}

pub async fn create_group(
    state: web::Data<AppState>,
    req: HttpRequest,
    draft: web::Json<GroupDraft>,
) -> Result<HttpResponse, AppError> {
    authorize_admin(&req, &state).await?;

    let new_group = draft.into_inner().validate()?;
    let group = state.groups.create(new_group).await?;

    info!("Group {} created in team {} with ID: {}", group.name, group.team_id, group.id);
    Ok(HttpResponse::Created().json(group))
}

// Groups of a team, optionally only one type
pub async fn list_groups(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListGroupsQuery>,
) -> Result<HttpResponse, AppError> {
    authorize_admin(&req, &state).await?;

    let query = query.into_inner();
    let team_id = match query.team_id {
        Some(team_id) if !team_id.trim().is_empty() => team_id.trim().to_string(),
        _ => return Err(AppError::validation(Some("team_id is required"))),
    };
    let group_type = match query.group_type {
        Some(group_type) => Some(group_type.parse::<GroupType>()?),
        None => None,
    };

    info!("Received request to list groups of team {}", team_id);
    let groups = state.groups.find_by_team(&team_id, group_type).await?;
    Ok(HttpResponse::Ok().json(GroupListResponse { groups }))
}

pub async fn get_group(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    authorize_admin(&req, &state).await?;

    let group_id = path.into_inner();
    match state.groups.find_by_id(&group_id).await? {
        Some(group) => Ok(HttpResponse::Ok().json(group)),
        None => {
            info!("Group not found: {}", group_id);
            Err(AppError::not_found(Some("Group not found")))
        }
    }
}

// Rename, retype, describe or (de)activate a group
pub async fn update_group(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    changes: web::Json<GroupChanges>,
) -> Result<HttpResponse, AppError> {
    authorize_admin(&req, &state).await?;

    let group_id = path.into_inner();
    let update = changes.into_inner().validate()?;
    let group = state.groups.update(&group_id, &update).await?;

    info!("Group {} updated", group.id);
    Ok(HttpResponse::Ok().json(group))
}
