use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// File suffixes never served from the static directory.
const PRIVATE_SUFFIXES: &[&str] = &[".db", ".log", ".env"];

/// Fixed window limit per client, applied to `/api` paths only.
pub async fn rate_limit_middleware(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !is_api_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let connect_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    // Only trust forwarded headers if explicitly configured (when behind a reverse proxy)
    let forwarded = forwarded_ip(&request);
    let client = match (app_state.config.trust_proxy, &forwarded) {
        (true, Some(ip)) => ip.clone(),
        _ => connect_ip.clone().unwrap_or_else(|| "unknown".to_string()),
    };

    tracing::debug!(
        trust_proxy = app_state.config.trust_proxy,
        connect_ip = ?connect_ip,
        forwarded_ip = ?forwarded,
        using_ip = %client,
        "Rate limiting request"
    );

    app_state.rate_limiter.check(&client).await?;

    Ok(next.run(request).await)
}

/// Answers 404 for dotfiles and data files before they reach the file server.
pub async fn block_private_files(request: Request, next: Next) -> Response {
    if is_private_path(request.uri().path()) {
        tracing::warn!(path = %request.uri().path(), "Refused private file request");
        return AppError::NotFound.into_response();
    }
    next.run(request).await
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn is_private_path(path: &str) -> bool {
    // ServeDir decodes the path itself, so check what it will actually open.
    let path = percent_decode_str(path)
        .decode_utf8_lossy()
        .to_ascii_lowercase()
        .replace('\\', "/");
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || PRIVATE_SUFFIXES
                .iter()
                .any(|suffix| segment.ends_with(suffix))
    })
}

fn forwarded_ip(req: &Request) -> Option<String> {
    // Extract IP from X-Forwarded-For or X-Real-IP headers
    if let Some(forwarded) = req.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let trimmed = first.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if let Some(real) = req.headers().get("x-real-ip")
        && let Ok(val) = real.to_str()
        && !val.trim().is_empty()
    {
        return Some(val.trim().to_string());
    }
    None
}
