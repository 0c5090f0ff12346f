//! Request extractors whose rejections use the JSON error body.
//!
//! Plain `axum::Json`, `Query` and `Path` answer malformed input with a
//! text/plain body. These wrappers route the rejection through
//! [`AppError`] so every 400 reads `{ "error": "..." }`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);
