pub mod admin;
pub mod auth;
pub mod users;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::HttpError;

/// Unwraps a JSON body, turning malformed input into the usual 400 error shape.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| HttpError::bad_request(rejection.body_text()))
}
