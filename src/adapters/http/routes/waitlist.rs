use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    adapters::http::app_state::AppState, app_error::AppResult,
    application::validators::SignupInput,
};

/// Reads one form field. Missing or null is absent; any other non-string
/// value becomes an empty string so it fails that field's validation.
fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => Some(String::new()),
    }
}

impl From<&Value> for SignupInput {
    fn from(body: &Value) -> Self {
        SignupInput {
            email: text_field(body, "email"),
            role: text_field(body, "role"),
            first_name: text_field(body, "first_name"),
            last_name: text_field(body, "last_name"),
            phone: text_field(body, "phone"),
        }
    }
}

#[derive(Serialize)]
struct SignupResponse {
    message: &'static str,
    id: i64,
}

/// POST /api/waitlist
async fn join_waitlist(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    // A body that isn't a JSON object carries no fields, so validation
    // answers with the usual 400 for the first missing one.
    let input = match payload {
        Ok(Json(body)) => SignupInput::from(&body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable signup body");
            SignupInput::default()
        }
    };

    let receipt = app_state.signup_use_cases.submit(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Successfully added to waitlist",
            id: receipt.id,
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/waitlist", post(join_waitlist))
}
