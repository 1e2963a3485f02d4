use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::handlers::{auth, directory, forms};
use crate::middleware::auth::AdminKey;
use crate::service::record_ops::RecordOps;

/// Largest JSON body accepted by any route.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct CadenceState {
    pub ops: RecordOps,
    pub admin_key: AdminKey,
    pub cookie_key: Key,
    pub insecure_cookie: bool,
}

impl CadenceState {
    pub fn new(
        ops: RecordOps,
        admin_key: Option<Arc<str>>,
        cookie_key: Key,
        insecure_cookie: bool,
    ) -> Self {
        Self {
            ops,
            admin_key: AdminKey::new(admin_key),
            cookie_key,
            insecure_cookie,
        }
    }
}

impl FromRef<CadenceState> for Key {
    fn from_ref(state: &CadenceState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<CadenceState> for AdminKey {
    fn from_ref(state: &CadenceState) -> Self {
        state.admin_key.clone()
    }
}

pub fn cadence_router(state: CadenceState) -> Router {
    Router::new()
        .route("/health", get(directory::health))
        .route(
            "/api/directory",
            get(directory::list_directory).post(directory::create_directory_entry),
        )
        .route(
            "/api/directory/{category}",
            get(directory::list_directory_category),
        )
        .route(
            "/api/resources",
            get(directory::list_resources).post(directory::create_resource),
        )
        .route("/api/subscribe", post(forms::subscribe))
        .route("/api/contact", post(forms::contact))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/user", get(auth::current_user))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
