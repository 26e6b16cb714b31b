use axum::Router;
use tower_http::cors::CorsLayer;

use crate::modules::session::manager::SessionManager;

pub mod config;
pub mod modules;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(modules::session::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
