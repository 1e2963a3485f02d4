use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{JsonBody, QueryParams};

use crate::db::models::{DirectoryEntry, Resource};
use crate::error::{FieldViolation, ValidationError, ViolationKind};
use crate::middleware::auth::RequireAdminKey;
use crate::service::filter::{ALL_TYPES, DirectoryFilter, ResourceFilter};
use crate::types::directory::ResourceTab;
use crate::{CadenceError, router::CadenceState};

fn all_types() -> String {
    ALL_TYPES.to_string()
}

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    #[serde(default)]
    pub search: String,
    #[serde(rename = "type", default = "all_types")]
    pub type_filter: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub search: String,
    pub category: Option<String>,
}

impl ResourceQuery {
    /// Missing tab means `all`; an unknown one is a field violation.
    fn tab(&self) -> Result<ResourceTab, ValidationError> {
        match self.category.as_deref() {
            None => Ok(ResourceTab::default()),
            Some(raw) => raw.parse().map_err(|_| ValidationError {
                violations: vec![FieldViolation::new("category", ViolationKind::UnknownVariant)],
            }),
        }
    }
}

/// GET /api/directory?search=&type=
pub async fn list_directory(
    State(state): State<CadenceState>,
    WithRejection(Query(query), _): QueryParams<DirectoryQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, CadenceError> {
    let mut entries = state.ops.list_directory_entries().await?;
    let filter = DirectoryFilter::new(&query.search, &query.type_filter);
    entries.retain(|e| filter.matches(e));
    Ok(Json(entries))
}

/// GET /api/directory/{category} where category is a sub-page slug.
pub async fn list_directory_category(
    State(state): State<CadenceState>,
    Path(category): Path<String>,
    WithRejection(Query(query), _): QueryParams<SearchQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, CadenceError> {
    let mut entries = state.ops.list_directory_category(&category).await?;
    let filter = DirectoryFilter::new(&query.search, ALL_TYPES);
    entries.retain(|e| filter.matches(e));
    Ok(Json(entries))
}

/// POST /api/directory (admin)
pub async fn create_directory_entry(
    _admin: RequireAdminKey,
    State(state): State<CadenceState>,
    WithRejection(Json(payload), _): JsonBody<Value>,
) -> Result<(StatusCode, Json<DirectoryEntry>), CadenceError> {
    let entry = state.ops.insert_directory_entry(&payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/resources?search=&category=
pub async fn list_resources(
    State(state): State<CadenceState>,
    WithRejection(Query(query), _): QueryParams<ResourceQuery>,
) -> Result<Json<Vec<Resource>>, CadenceError> {
    let tab = query.tab()?;
    let mut resources = state.ops.list_resources().await?;
    let filter = ResourceFilter::new(&query.search, tab);
    resources.retain(|r| filter.matches(r));
    Ok(Json(resources))
}

/// POST /api/resources (admin)
pub async fn create_resource(
    _admin: RequireAdminKey,
    State(state): State<CadenceState>,
    WithRejection(Json(payload), _): JsonBody<Value>,
) -> Result<(StatusCode, Json<Resource>), CadenceError> {
    let resource = state.ops.insert_resource(&payload).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
