//! Login sessions carried in an encrypted cookie.
//!
//! The cookie holds only the user id; [`CurrentUser`] resolves it against
//! storage on every request, so there is no process-wide "current user".

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;
use tracing::warn;

use crate::db::models::User;
use crate::error::CadenceError;
use crate::router::CadenceState;

pub const SESSION_COOKIE: &str = "cadence_session";
const SESSION_DAYS: i64 = 7;

/// Build the cookie encryption key from the configured secret, or a random
/// per-process key when none is configured.
pub fn cookie_key(secret: Option<&str>) -> Result<Key, CadenceError> {
    match secret {
        Some(secret) => Key::try_from(secret.as_bytes()).map_err(|_| {
            CadenceError::Config("cookie_secret must be at least 64 bytes".to_string())
        }),
        None => {
            warn!("no cookie_secret configured; sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

pub fn start_session(jar: PrivateCookieJar, user_id: i64, insecure: bool) -> PrivateCookieJar {
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_DAYS))
        .build();
    jar.add(cookie)
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::new(SESSION_COOKIE, "")).path("/").build())
}

/// The authenticated user of this request; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    CadenceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CadenceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = CadenceState::from_ref(state);
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());

        let user_id = jar
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok())
            .ok_or(CadenceError::Unauthenticated)?;

        match state.ops.get_user(user_id).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(CadenceError::NotFound(_)) => Err(CadenceError::Unauthenticated),
            Err(e) => Err(e),
        }
    }
}
