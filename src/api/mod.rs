mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::ScheduleController;

pub fn create_router(controller: ScheduleController) -> Router {
    let api = Router::new()
        // Triggers
        .route("/load", post(handlers::load))
        .route("/day", put(handlers::select_day))
        // Output
        .route("/schedule", get(handlers::get_schedule))
        .route("/status", get(handlers::get_status))
        .route("/days", get(handlers::list_days))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(controller)
}
