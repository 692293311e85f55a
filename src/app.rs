use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/checkin", post(handlers::checkin_form))
        .route("/api/recent", get(handlers::get_recent))
        .route("/api/checkin", post(handlers::checkin))
        .with_state(state)
}
