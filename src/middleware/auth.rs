use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::CadenceError;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Configured admin key. `None` means admin writes are disabled.
#[derive(Debug, Clone, Default)]
pub struct AdminKey(Option<Arc<str>>);

impl AdminKey {
    pub fn new(key: Option<Arc<str>>) -> Self {
        Self(key.filter(|k| !k.is_empty()))
    }

    fn matches(&self, candidate: &str) -> bool {
        self.0
            .as_deref()
            .is_some_and(|expected| bool::from(candidate.as_bytes().ct_eq(expected.as_bytes())))
    }
}

/// Ensure the inbound request carries the admin key.
/// Accepts either:
/// - Header: `x-admin-key: ...`
/// - Header: `Authorization: Bearer ...`
pub fn ensure_admin(headers: &HeaderMap, expected: &AdminKey) -> Result<(), CadenceError> {
    if let Some(hv) = headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok())
        && expected.matches(hv)
    {
        return Ok(());
    }

    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let auth = auth.trim();
        if let Some(token) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && expected.matches(token)
        {
            return Ok(());
        }
    }

    Err(CadenceError::Unauthorized)
}

#[derive(Debug, Clone, Copy)]
pub struct RequireAdminKey;

impl<S> FromRequestParts<S> for RequireAdminKey
where
    AdminKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CadenceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let expected = AdminKey::from_ref(state);
        ensure_admin(&parts.headers, &expected)?;
        Ok(Self)
    }
}
