use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use super::JsonBody;
use crate::db::models::{ContactMessage, Subscriber};
use crate::{CadenceError, router::CadenceState};

/// POST /api/subscribe `{ email }`
pub async fn subscribe(
    State(state): State<CadenceState>,
    WithRejection(Json(payload), _): JsonBody<Value>,
) -> Result<(StatusCode, Json<Subscriber>), CadenceError> {
    let subscriber = state.ops.insert_subscriber(&payload).await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// POST /api/contact `{ name, email, subject, message }`
pub async fn contact(
    State(state): State<CadenceState>,
    WithRejection(Json(payload), _): JsonBody<Value>,
) -> Result<(StatusCode, Json<ContactMessage>), CadenceError> {
    let message = state.ops.insert_contact_message(&payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
