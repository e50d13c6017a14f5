use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use sqlx::mysql::MySqlPoolOptions;
use std::io;
use std::sync::Arc;

use interview_scheduler::{config::Settings, routes, state::AppState, store::MySqlStore};

fn startup_error<E: std::fmt::Display>(context: &str, e: E) -> io::Error {
    error!("{}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let state = match &settings.database_url {
        Some(database_url) => {
            let pool = MySqlPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await
                .map_err(|e| startup_error("Failed to create pool", e))?;
            let store = MySqlStore::new(pool);
            store
                .ensure_schema()
                .await
                .map_err(|e| startup_error("Failed to prepare schema", e))?;
            AppState::new(Arc::new(store), settings.bcrypt_cost)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            AppState::in_memory(settings.bcrypt_cost)
        }
    };

    if let Some(admin) = &settings.admin {
        state
            .seed_admin(admin)
            .await
            .map_err(|e| startup_error("Failed to seed admin account", e))?;
    }

    let server_address = settings.server_address.clone();
    info!("Server running at http://{}", server_address);

    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Interview scheduler is running") }))
            .configure(routes::routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
