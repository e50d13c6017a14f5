use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

use super::dashboard_models::{group_stat_cards, StatsQuery, StatsResponse};
use crate::errors::AppError;
use crate::routes::session::{current_user, require_admin};
use crate::state::AppState;

// Group figures of one team for the admin dashboard
pub async fn team_stats(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    require_admin(&user)?;

    let team_id = match query.into_inner().team_id {
        Some(team_id) if !team_id.trim().is_empty() => team_id.trim().to_string(),
        _ => return Err(AppError::validation(Some("team_id is required"))),
    };

    info!("Received request for dashboard stats of team {}", team_id);
    let groups = state.groups.find_by_team(&team_id, None).await?;
    Ok(HttpResponse::Ok().json(StatsResponse {
        cards: group_stat_cards(&groups),
        team_id,
    }))
}
