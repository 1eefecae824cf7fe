use thiserror::Error;
use uuid::Uuid;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Payment proof {0} not found")]
    PaymentProofNotFound(String),

    #[error("Referral {0} not found")]
    ReferralNotFound(Uuid),

    #[error("Withdraw request {0} not found")]
    WithdrawRequestNotFound(Uuid),

    #[error("Invalid referral code")]
    InvalidReferralCode,

    #[error("Payment proof {0} has already been reviewed")]
    ProofAlreadyReviewed(Uuid),

    #[error("Referral {0} is already completed")]
    ReferralAlreadyCompleted(Uuid),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Withdraw request {0} has already been processed")]
    WithdrawAlreadyProcessed(Uuid),

    #[error("You are not allowed to perform this action")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => ServiceError::StorageUnavailable(error.to_string()),
            other => ServiceError::Database(other),
        }
    }
}

impl From<ErrorMessage> for ServiceError {
    fn from(error: ErrorMessage) -> Self {
        match error {
            ErrorMessage::ExceededMaxPasswordLength(_) | ErrorMessage::EmptyPassword => {
                ServiceError::Validation(error.to_string())
            }
            other => ServiceError::Other(other.to_string()),
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::DuplicateEmail(_) => {
                HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
            }

            ServiceError::UserNotFound(_)
            | ServiceError::PaymentProofNotFound(_)
            | ServiceError::ReferralNotFound(_)
            | ServiceError::WithdrawRequestNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::InvalidReferralCode
            | ServiceError::ProofAlreadyReviewed(_)
            | ServiceError::ReferralAlreadyCompleted(_)
            | ServiceError::InsufficientBalance { .. }
            | ServiceError::WithdrawAlreadyProcessed(_)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::Unauthorized => {
                HttpError::forbidden(ErrorMessage::PermissionDenied.to_string())
            }

            ServiceError::StorageUnavailable(ref detail) => {
                tracing::error!("Storage unavailable: {}", detail);
                HttpError::service_unavailable(ErrorMessage::ServiceUnavailable.to_string())
            }

            ServiceError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }

            ServiceError::Other(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        }
    }
}
