use actix_web::web;

use super::auth::auth_handlers;
use super::dashboard::dashboard_handlers;
use super::group::group_handlers;
use crate::errors::json_error_handler;

/// Registers every scope of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
    auth_configure(cfg);
    group_configure(cfg);
    dashboard_configure(cfg);
}

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-auth")
            .route("", web::get().to(auth_handlers::auth_get))
            .route("/", web::get().to(auth_handlers::auth_get))
            .route("/check-username", web::post().to(auth_handlers::check_username))
            .route("/check-email", web::post().to(auth_handlers::check_email))
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/logout", web::post().to(auth_handlers::logout))
            .route("/me", web::get().to(auth_handlers::me))
            .route("/forgot-password", web::post().to(auth_handlers::forgot_password))
            .route("/reset-password", web::post().to(auth_handlers::reset_password))
    );
}

pub fn group_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-groups")
            .route("", web::post().to(group_handlers::create_group))
            .route("", web::get().to(group_handlers::list_groups))
            .route("/{group_id}", web::get().to(group_handlers::get_group))
            .route("/{group_id}", web::patch().to(group_handlers::update_group))
    );
}

pub fn dashboard_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-dashboard")
            .route("/stats", web::get().to(dashboard_handlers::team_stats))
    );
}
