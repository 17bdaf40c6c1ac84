use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/syllabus", get(handlers::get_syllabus))
        .route("/api/syllabus/:subject/:topic/toggle", post(handlers::toggle_topic))
        .route("/api/todos/:date", get(handlers::get_todos).post(handlers::add_todo))
        .route("/api/todos/:date/:id/toggle", post(handlers::toggle_todo))
        .route("/api/todos/:date/:id", delete(handlers::remove_todo))
        .route("/api/calendar/:month", get(handlers::get_calendar))
        .route("/api/history", get(handlers::get_history))
        .route("/api/history/:date/:id/toggle", post(handlers::toggle_history_todo))
        .route("/api/activity", get(handlers::get_activity))
        .route("/api/countdown", get(handlers::get_countdown))
        .with_state(state)
}
