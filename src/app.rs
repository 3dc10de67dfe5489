use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/streaks/add", post(handlers::add_streak_form))
        .route("/streaks/:id/checkin", post(handlers::check_in_form))
        .route("/streaks/:id/fail", post(handlers::fail_streak_form))
        .route("/streaks/:id/delete", post(handlers::delete_streak_form))
        .route(
            "/api/streaks",
            get(handlers::list_streaks).post(handlers::add_streak),
        )
        .route("/api/streaks/:id", delete(handlers::delete_streak))
        .route("/api/streaks/:id/checkin", post(handlers::check_in))
        .route("/api/streaks/:id/fail", post(handlers::fail_streak))
        .route("/api/streaks/:id/analytics", get(handlers::get_analytics))
        .route("/api/export", get(handlers::export_streaks))
        .route("/api/import", post(handlers::import_streaks))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        .route("/api/milestone/ack", post(handlers::ack_milestone))
        .with_state(state)
}
