use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    dtos::{
        referraldtos::ReferralSummaryResponseDto,
        userdtos::{FilterUserDto, UserData, UserResponseDto},
        withdrawdtos::WithdrawRequestDto,
    },
    error::HttpError,
    handler::json_body,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/verification-status", get(get_verification_status))
        .route("/referrals", get(get_referrals))
        .route("/referral-link", get(get_referral_link))
        .route(
            "/withdrawals",
            get(get_withdrawals).post(request_withdrawal),
        )
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&user.user);

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    }))
}

pub async fn get_verification_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let status = app_state
        .verification_service
        .get_verification_status(user.user.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": status,
    })))
}

pub async fn get_referrals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let summary = app_state
        .referral_service
        .get_user_referrals(user.user.id)
        .await?;

    Ok(Json(ReferralSummaryResponseDto::from_summary(&summary)))
}

pub async fn get_referral_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let link = app_state
        .referral_service
        .get_referral_link(user.user.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "referral_code": user.user.referral_code,
        "referral_link": link,
    })))
}

pub async fn get_withdrawals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let withdrawals = app_state
        .withdraw_service
        .get_user_withdrawals(user.user.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": withdrawals.len(),
        "withdrawals": withdrawals,
    })))
}

pub async fn request_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    payload: Result<Json<WithdrawRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    let withdrawal = app_state
        .withdraw_service
        .request_withdrawal(user.user.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "withdrawal": withdrawal,
        })),
    ))
}
