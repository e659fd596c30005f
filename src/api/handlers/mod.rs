use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::models::{schedule_table, DaySchedule};
use crate::state::{ScheduleController, StatusSnapshot, View};

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Deserialize)]
pub struct SelectDayInput {
    pub day: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Preview another day without changing the selection.
    pub day: Option<String>,
}

/// Status code for a view returned by the load trigger.
fn load_status(view: &View) -> StatusCode {
    match view {
        View::Busy => StatusCode::CONFLICT,
        View::LoadError { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Triggers
// ============================================================

pub async fn load(State(controller): State<ScheduleController>) -> (StatusCode, Json<View>) {
    let view = controller.on_load_requested().await;
    (load_status(&view), Json(view))
}

pub async fn select_day(
    State(controller): State<ScheduleController>,
    Json(input): Json<SelectDayInput>,
) -> Json<View> {
    Json(controller.on_day_selected(&input.day))
}

// ============================================================
// Output
// ============================================================

pub async fn get_schedule(
    State(controller): State<ScheduleController>,
    Query(query): Query<ScheduleQuery>,
) -> Json<View> {
    match query.day {
        Some(day) => Json(controller.preview_day(&day)),
        None => Json(controller.current_view()),
    }
}

pub async fn get_status(State(controller): State<ScheduleController>) -> Json<StatusSnapshot> {
    Json(controller.status())
}

pub async fn list_days() -> Json<Vec<DaySchedule>> {
    Json(schedule_table())
}
