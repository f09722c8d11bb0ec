use std::any::Any;

use axum::{
    Json, Router,
    handler::HandlerWithoutStateExt,
    http::{self, StatusCode},
    middleware,
    response::{IntoResponse, Response},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::adapters::http::{
    self as http_adapter,
    app_state::AppState,
    middleware::{block_private_files, rate_limit_middleware},
    routes::not_found,
};

pub fn create_app(app_state: AppState) -> Router {
    let static_files = ServiceBuilder::new()
        .layer(middleware::from_fn(block_private_files))
        .service(ServeDir::new(&app_state.config.static_dir).fallback(not_found.into_service()));

    let router = Router::new()
        .nest("/api", http_adapter::routes::router())
        .merge(http_adapter::routes::pages_router())
        .fallback_service(static_files)
        .with_state(app_state.clone());

    with_layers(router, &app_state)
}

fn with_layers(router: Router, app_state: &AppState) -> Router {
    let cors = match &app_state.config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin.clone()))
            .allow_methods([http::Method::GET, http::Method::POST])
            .allow_headers([http::header::CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };

    router
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit_middleware,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::REFERRER_POLICY,
            http::HeaderValue::from_static("no-referrer"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Something went wrong!" })),
    )
        .into_response()
}
