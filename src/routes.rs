pub mod routes;
pub mod session;

pub mod auth {
    pub mod auth_handlers;
    pub mod auth_models;
}

pub mod group {
    pub mod group_handlers;
    pub mod group_models;
}

pub mod dashboard {
    pub mod dashboard_handlers;
    pub mod dashboard_models;
}
