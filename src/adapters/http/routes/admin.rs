use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Serialize)]
struct CountResponse {
    count: i64,
}

#[derive(Serialize)]
struct NotifyLaunchResponse {
    message: &'static str,
    success: u64,
    errors: u64,
    total: u64,
}

/// GET /api/admin/waitlist-count
async fn waitlist_count(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let count = app_state.admin_use_cases.count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/admin/waitlist
async fn waitlist_entries(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = app_state.admin_use_cases.list().await?;
    Ok(Json(entries))
}

/// POST /api/admin/notify-launch
async fn notify_launch(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = app_state.admin_use_cases.notify_launch().await?;
    Ok(Json(NotifyLaunchResponse {
        message: "Launch notification process completed",
        success: report.success,
        errors: report.errors,
        total: report.total,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/waitlist-count", get(waitlist_count))
        .route("/waitlist", get(waitlist_entries))
        .route("/notify-launch", post(notify_launch))
}
