pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod password;
pub mod routes;
pub mod state;
pub mod store;
