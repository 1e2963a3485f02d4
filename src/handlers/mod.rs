use axum::{Json, extract::Query};
use axum_extra::extract::WithRejection;

use crate::CadenceError;

pub mod auth;
pub mod directory;
pub mod forms;

/// JSON body whose rejections render through `CadenceError`.
pub type JsonBody<T> = WithRejection<Json<T>, CadenceError>;

/// Query string whose rejections render through `CadenceError`.
pub type QueryParams<T> = WithRejection<Query<T>, CadenceError>;
