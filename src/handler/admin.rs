use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        admindtos::{CreateUserDto, ReviewPaymentProofDto, ReviewedPaymentProofDto, UpdateVerificationDto},
        referraldtos::{CreateReferralDto, CreateReferralResponseDto},
        userdtos::{FilterUserDto, UserData, UserResponseDto},
        withdrawdtos::ProcessWithdrawalDto,
    },
    error::HttpError,
    handler::json_body,
    middleware::{role_check, JWTAuthMiddeware},
    models::{
        referralmodel::{NewReferral, ReferralStatus},
        usermodel::UserRole,
    },
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/users", get(get_users).post(create_user))
        .route("/users/:id/verification", put(update_verification))
        .route("/admins", get(get_admins))
        .route("/referrals", get(get_referrals).post(create_referral))
        .route("/referrals/:id/complete", put(complete_referral))
        .route("/payment-proofs", get(get_payment_proofs))
        .route("/payment-proofs/:id/review", put(review_payment_proof))
        .route("/withdrawals", get(get_withdrawals))
        .route("/withdrawals/:id", put(process_withdrawal))
        .layer(middleware::from_fn(|req: Request, next: Next| {
            role_check(req, next, vec![UserRole::Admin])
        }))
}

pub async fn get_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.admin_service.get_admin_stats().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": stats,
    })))
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state.admin_service.get_all_users().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": users.len(),
        "users": users,
    })))
}

pub async fn get_admins(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let admins = app_state.admin_service.get_all_admins().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": admins.len(),
        "admins": admins,
    })))
}

pub async fn create_user(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    let user = app_state.registration_service.create_user(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponseDto {
            status: "success".to_string(),
            data: UserData {
                user: FilterUserDto::filter_user(&user),
            },
        }),
    ))
}

pub async fn update_verification(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<UpdateVerificationDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    let user = app_state
        .verification_service
        .update_user_verification_status(user_id, body.is_verified)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn get_referrals(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let referrals = app_state.admin_service.get_all_referrals().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": referrals.len(),
        "referrals": referrals,
    })))
}

pub async fn create_referral(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateReferralDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let referral = app_state
        .referral_service
        .create_referral(NewReferral {
            referrer_id: body.referrer_id,
            referred_id: body.referred_id,
            status: body.status.unwrap_or(ReferralStatus::Pending),
            reward: body.reward.unwrap_or(app_state.env.referral_reward),
        })
        .await?;

    let status = if referral.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(CreateReferralResponseDto {
            status: "success".to_string(),
            created: referral.is_some(),
            referral,
        }),
    ))
}

pub async fn complete_referral(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(referral_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let referral = app_state
        .referral_service
        .complete_referral(referral_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "referral": referral,
    })))
}

pub async fn get_payment_proofs(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let proofs = app_state.admin_service.get_all_payment_proofs().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": proofs.len(),
        "payment_proofs": proofs,
    })))
}

pub async fn review_payment_proof(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(admin): Extension<JWTAuthMiddeware>,
    Path(proof_id): Path<String>,
    payload: Result<Json<ReviewPaymentProofDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let reviewed = app_state
        .verification_service
        .review_payment_proof(&proof_id, body.status, admin.user.id, body.admin_note)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": ReviewedPaymentProofDto::from_review(&reviewed),
    })))
}

pub async fn get_withdrawals(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let withdrawals = app_state.admin_service.get_all_withdraw_requests().await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": withdrawals.len(),
        "withdrawals": withdrawals,
    })))
}

pub async fn process_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    payload: Result<Json<ProcessWithdrawalDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    let withdrawal = app_state
        .withdraw_service
        .process_withdrawal(request_id, body.status)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "withdrawal": withdrawal,
    })))
}
