use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::modules::session::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat/sessions", get(controller::list_sessions))
        .route("/api/chat/sessions", post(controller::create_session))
        .route("/api/chat/sessions", delete(controller::clear_sessions))
        .route("/api/chat/sessions/{id}", get(controller::get_session))
        .route("/api/chat/sessions/{id}", patch(controller::rename_session))
        .route("/api/chat/sessions/{id}", delete(controller::delete_session))
        .route("/api/chat/active", put(controller::select_session))
        .route("/api/chat/send", post(controller::send_message))
        .route("/api/chat/status", get(controller::status))
        .route("/api/chat/quick-questions", get(controller::quick_questions))
}
