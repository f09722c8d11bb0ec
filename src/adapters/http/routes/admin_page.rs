use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::adapters::http::app_state::AppState;

/// GET /admin
async fn dashboard(State(app_state): State<AppState>) -> Response {
    match app_state.admin_use_cases.dashboard().await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render admin dashboard");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

/// POST /admin/clear
async fn clear(State(app_state): State<AppState>) -> Response {
    match app_state.admin_use_cases.clear().await {
        Ok(_) => Redirect::to("/admin").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear waitlist");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error clearing database").into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/clear", post(clear))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use axum_test::TestServer;

    use crate::test_utils::{TestAppStateBuilder, create_test_entry};

    fn build_test_router(app_state: AppState) -> Router<()> {
        router().with_state(app_state)
    }

    #[tokio::test]
    async fn dashboard_renders_entries() {
        let app_state = TestAppStateBuilder::new()
            .with_entries(vec![create_test_entry(|e| {
                e.first_name = Some("Grace".into());
                e.last_name = Some("Hopper".into());
            })])
            .build();
        let server = TestServer::new(build_test_router(app_state)).unwrap();

        let response = server.get("/admin").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Grace Hopper"));
        assert!(html.contains("Total Signups: <strong>1</strong>"));
    }

    #[tokio::test]
    async fn dashboard_escapes_stored_names() {
        let app_state = TestAppStateBuilder::new()
            .with_entries(vec![create_test_entry(|e| {
                e.first_name = Some("<img src=x onerror=alert(1)>".into());
            })])
            .build();
        let server = TestServer::new(build_test_router(app_state)).unwrap();

        let html = server.get("/admin").await.text();

        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img"));
    }

    #[tokio::test]
    async fn dashboard_store_failure_is_plain_text() {
        let mocks = TestAppStateBuilder::new().build_with_mocks();
        mocks.repo.fail_reads();
        let server = TestServer::new(build_test_router(mocks.state)).unwrap();

        let response = server.get("/admin").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Database error");
    }

    #[tokio::test]
    async fn clear_empties_the_list_and_redirects() {
        let mocks = TestAppStateBuilder::new()
            .with_entries(vec![create_test_entry(|_| {})])
            .build_with_mocks();
        let server = TestServer::new(build_test_router(mocks.state)).unwrap();

        let response = server.post("/admin/clear").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(LOCATION), "/admin");
        assert!(mocks.repo.get(1).is_none());
    }
}
