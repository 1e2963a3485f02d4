use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::fmt;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CadenceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("duplicate value for unique field `{field}`")]
    DuplicateKey { field: String },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not authenticated")]
    Unauthenticated,

    #[error("invalid or missing admin key")]
    Unauthorized,

    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(SqlxError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("invalid object key: {0}")]
    InvalidObjectKey(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be read at all (bad JSON, wrong content type,
    /// body too large, unparsable query string).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for CadenceError {
    fn from(rejection: JsonRejection) -> Self {
        CadenceError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for CadenceError {
    fn from(rejection: QueryRejection) -> Self {
        CadenceError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

fn rejection_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => "MALFORMED_REQUEST",
    }
}

impl From<SqlxError> for CadenceError {
    fn from(e: SqlxError) -> Self {
        match e {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                CadenceError::Unavailable(e.to_string())
            }
            SqlxError::RowNotFound => CadenceError::NotFound("record"),
            SqlxError::Database(ref db_err) if db_err.is_unique_violation() => {
                CadenceError::DuplicateKey {
                    field: unique_violation_field(db_err.message()),
                }
            }
            other => CadenceError::DatabaseError(other),
        }
    }
}

/// SQLite reports `UNIQUE constraint failed: table.column`; keep the column.
fn unique_violation_field(message: &str) -> String {
    message
        .rsplit(['.', ' '])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

impl From<argon2::password_hash::Error> for CadenceError {
    fn from(e: argon2::password_hash::Error) -> Self {
        CadenceError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for CadenceError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, fields) = match &self {
            CadenceError::Validation(v) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                v.violations.clone(),
            ),
            CadenceError::DuplicateKey { field } => (
                StatusCode::CONFLICT,
                "DUPLICATE_KEY",
                vec![FieldViolation::new(field.clone(), ViolationKind::Duplicate)],
            ),
            CadenceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", Vec::new()),
            CadenceError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                Vec::new(),
            ),
            CadenceError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", Vec::new())
            }
            CadenceError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", Vec::new()),
            CadenceError::Unavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", Vec::new())
            }
            CadenceError::InvalidObjectKey(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_OBJECT_KEY", Vec::new())
            }
            CadenceError::Rejected { status, .. } if status.is_client_error() => {
                (*status, rejection_code(*status), Vec::new())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                Vec::new(),
            ),
        };

        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => {
                    "Service temporarily unavailable, please retry.".to_string()
                }
                _ => "An internal error occurred.".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Why a single payload field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    Blank,
    InvalidEmail,
    UnknownVariant,
    NotAnObject,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: ViolationKind) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Every field violation found in one insert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    pub fn reason_for(&self, field: &str) -> Option<ViolationKind> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.reason)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}
