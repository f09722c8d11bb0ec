pub mod admin;
pub mod admin_page;
pub mod waitlist;

use axum::Router;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// JSON API, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(waitlist::router())
        .nest("/admin", admin::router())
        .fallback(not_found)
}

/// Server-rendered admin pages.
pub fn pages_router() -> Router<AppState> {
    admin_page::router()
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
