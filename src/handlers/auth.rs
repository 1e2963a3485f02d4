use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::{WithRejection, cookie::PrivateCookieJar};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::JsonBody;
use crate::db::models::User;
use crate::middleware::session::{CurrentUser, end_session, start_session};
use crate::service::validation::validate_login;
use crate::{CadenceError, router::CadenceState};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: User,
}

/// POST /api/auth/login `{ email, password, userType }` -> sets the session
/// cookie on success.
pub async fn login(
    State(state): State<CadenceState>,
    jar: PrivateCookieJar,
    WithRejection(Json(payload), _): JsonBody<Value>,
) -> Result<(PrivateCookieJar, Json<AuthResponse>), CadenceError> {
    let creds = validate_login(&payload)?;
    let user = match state
        .ops
        .get_user_by_credentials(&creds.email, &creds.password, &creds.user_type)
        .await
    {
        Ok(user) => user,
        Err(CadenceError::NotFound(_)) => return Err(CadenceError::InvalidCredentials),
        Err(e) => return Err(e),
    };

    let jar = start_session(jar, user.id, state.insecure_cookie);
    info!(id = user.id, "user logged in");
    Ok((jar, Json(AuthResponse { success: true, user })))
}

/// POST /api/auth/register -> creates the account and logs it in.
pub async fn register(
    State(state): State<CadenceState>,
    jar: PrivateCookieJar,
    WithRejection(Json(payload), _): JsonBody<Value>,
) -> Result<(StatusCode, PrivateCookieJar, Json<AuthResponse>), CadenceError> {
    let user = state.ops.register_user(&payload).await?;
    let jar = start_session(jar, user.id, state.insecure_cookie);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            user,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    (end_session(jar), Json(json!({ "success": true })))
}

/// GET /api/auth/user -> 401 when no valid session.
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
