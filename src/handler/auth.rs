use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{LoginUserDto, RegisterUserDto, Response, UserLoginResponseDto},
    error::{ErrorMessage, HttpError},
    handler::json_body,
    models::usermodel::UserStatus,
    service::{error::ServiceError, registration_service::normalize_email},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<RegisterUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    let receipt = app_state
        .registration_service
        .register_with_payment_proof(body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Registration received. Your payment proof is awaiting review.",
            "data": receipt,
        })),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<LoginUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let mut body = json_body(payload)?;
    body.email = normalize_email(&body.email);
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()));
    }

    if user.status == UserStatus::Suspended {
        return Err(HttpError::forbidden(ErrorMessage::AccountSuspended.to_string()));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token for {}: {}", user.id, e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );

    tracing::info!("User {} logged in", user.id);

    let mut response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );

    let mut response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}
