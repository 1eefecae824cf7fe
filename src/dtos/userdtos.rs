use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{usermodel::User, verificationmodels::PaymentProof};

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone_regex = regex::Regex::new(r"^\+?[0-9][0-9 \-]{0,19}$")
        .map_err(|_| ValidationError::new("Invalid phone regex"))?;

    if !phone_regex.is_match(phone.trim()) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "Phone number must contain digits only, optionally starting with +",
        ));
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Phone number is required"),
        custom = "validate_phone"
    )]
    pub phone: String,

    #[validate(length(max = 64, message = "Telegram username is too long"))]
    pub telegram_username: Option<String>,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters"),
        length(max = 64, message = "Password must not be more than 64 characters")
    )]
    pub password: String,

    /// Location of the uploaded payment proof, as returned by file storage
    #[validate(
        length(min = 1, max = 2048, message = "Payment proof image is required"),
        url(message = "Payment proof image must be a valid URL")
    )]
    pub image_url: String,

    pub referral_code: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub telegram_username: Option<String>,
    pub role: String,
    pub referral_code: String,
    pub balance: i64,
    pub total_earnings: i64,
    pub is_verified: bool,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            phone: user.phone.clone(),
            telegram_username: user.telegram_username.clone(),
            role: user.role.to_str().to_string(),
            referral_code: user.referral_code.to_owned(),
            balance: user.balance,
            total_earnings: user.total_earnings,
            is_verified: user.is_verified,
            status: user.status.label().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegistrationReceipt {
    pub user_id: Uuid,
    pub payment_proof_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationStatusDto {
    pub is_verified: bool,
    pub proof_status: String,
    pub admin_note: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl VerificationStatusDto {
    pub fn from_latest_proof(is_verified: bool, latest: Option<&PaymentProof>) -> Self {
        match latest {
            Some(proof) => VerificationStatusDto {
                is_verified,
                proof_status: proof.status.label().to_string(),
                admin_note: proof.admin_note.clone(),
                submitted_at: Some(proof.created_at),
                reviewed_at: proof.admin_id.map(|_| proof.updated_at),
            },
            None => VerificationStatusDto {
                is_verified,
                proof_status: "Not submitted".to_string(),
                admin_note: None,
                submitted_at: None,
                reviewed_at: None,
            },
        }
    }
}
