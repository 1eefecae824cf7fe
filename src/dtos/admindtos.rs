use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::userdtos::{validate_phone, FilterUserDto},
    models::{
        referralmodel::{ReferralActivityRow, ReferralRow},
        usermodel::{User, UserRole},
        verificationmodels::{PaymentProof, PaymentProofRow, PaymentProofStatus, ReviewedPaymentProof},
        walletmodels::WithdrawRequestRow,
    },
    utils::display,
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(max = 64, message = "Telegram username is too long"))]
    pub telegram_username: Option<String>,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        length(max = 64, message = "Password must not be more than 64 characters")
    )]
    pub password: String,

    pub role: Option<UserRole>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPaymentProofDto {
    pub status: PaymentProofStatus,

    #[validate(length(max = 1000, message = "Admin note must not exceed 1000 characters"))]
    pub admin_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVerificationDto {
    pub is_verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewedPaymentProofDto {
    pub payment_proof: PaymentProof,
    pub user: FilterUserDto,
}

impl ReviewedPaymentProofDto {
    pub fn from_review(reviewed: &ReviewedPaymentProof) -> Self {
        ReviewedPaymentProofDto {
            payment_proof: reviewed.payment_proof.clone(),
            user: FilterUserDto::filter_user(&reviewed.user),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub telegram: String,
    pub role: String,
    pub referral_code: String,
    pub balance: i64,
    pub total_earnings: i64,
    pub is_verified: bool,
    pub status: String,
    pub joined: String,
}

impl UserListItem {
    pub fn from_user(user: &User) -> Self {
        UserListItem {
            id: user.id,
            name: display::text_or(Some(&user.name), display::UNKNOWN),
            email: display::text_or(Some(&user.email), display::NO_EMAIL),
            phone: display::text_or(user.phone.as_deref(), display::NOT_PROVIDED),
            telegram: display::text_or(user.telegram_username.as_deref(), display::NOT_PROVIDED),
            role: user.role.to_str().to_string(),
            referral_code: user.referral_code.clone(),
            balance: user.balance,
            total_earnings: user.total_earnings,
            is_verified: user.is_verified,
            status: display::text_or(Some(user.status.label()), display::DEFAULT_STATUS),
            joined: display::format_date(Some(user.created_at)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReferralListItem {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referrer_name: String,
    pub referrer_email: String,
    pub referred_id: Uuid,
    pub referred_name: String,
    pub referred_email: String,
    pub status: String,
    pub reward: i64,
    pub date: String,
}

impl ReferralListItem {
    pub fn from_row(row: &ReferralRow) -> Self {
        ReferralListItem {
            id: row.id,
            referrer_id: row.referrer_id,
            referrer_name: display::text_or(row.referrer_name.as_deref(), display::UNKNOWN),
            referrer_email: display::text_or(row.referrer_email.as_deref(), display::NO_EMAIL),
            referred_id: row.referred_id,
            referred_name: display::text_or(row.referred_name.as_deref(), display::UNKNOWN),
            referred_email: display::text_or(row.referred_email.as_deref(), display::NO_EMAIL),
            status: row.status.label().to_string(),
            reward: row.reward,
            date: display::format_date(row.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProofOwnerDto {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub telegram: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProofReviewerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentProofListItem {
    pub id: Uuid,
    pub image_url: String,
    pub status: String,
    pub admin_note: Option<String>,
    pub date: String,
    pub user: ProofOwnerDto,
    pub reviewed_by: Option<ProofReviewerDto>,
}

impl PaymentProofListItem {
    pub fn from_row(row: &PaymentProofRow) -> Self {
        PaymentProofListItem {
            id: row.id,
            image_url: row.image_url.clone(),
            status: row.status.label().to_string(),
            admin_note: row.admin_note.clone(),
            date: display::format_date(row.created_at),
            user: ProofOwnerDto {
                id: row.user_id,
                name: display::text_or(row.user_name.as_deref(), display::UNKNOWN),
                email: display::text_or(row.user_email.as_deref(), display::NO_EMAIL),
                telegram: display::text_or(row.user_telegram.as_deref(), display::NOT_PROVIDED),
            },
            reviewed_by: row.admin_id.map(|id| ProofReviewerDto {
                id,
                name: display::text_or(row.admin_name.as_deref(), display::UNKNOWN),
                email: display::text_or(row.admin_email.as_deref(), display::NO_EMAIL),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WithdrawListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub method: String,
    pub amount: i64,
    pub account_info: String,
    pub status: String,
    pub date: String,
}

impl WithdrawListItem {
    pub fn from_row(row: &WithdrawRequestRow) -> Self {
        WithdrawListItem {
            id: row.id,
            user_id: row.user_id,
            user_name: display::text_or(row.user_name.as_deref(), display::UNKNOWN),
            user_email: display::text_or(row.user_email.as_deref(), display::NO_EMAIL),
            method: row.method.clone(),
            amount: row.amount,
            account_info: row.account_info.clone(),
            status: row.status.label().to_string(),
            date: display::format_date(row.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecentActivity {
    pub user: String,
    pub activity: String,
    pub date: String,
    pub status: String,
}

impl RecentActivity {
    pub fn from_row(row: &ReferralActivityRow) -> Self {
        RecentActivity {
            user: display::text_or(row.referrer_name.as_deref(), display::UNKNOWN),
            activity: format!(
                "Referred {}",
                display::text_or(row.referred_name.as_deref(), display::UNKNOWN)
            ),
            date: display::format_date(row.created_at),
            status: row.status.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AdminStats {
    pub total_users: i64,
    pub active_referrals: i64,
    pub total_payouts: i64,
    pub recent_activities: Vec<RecentActivity>,
}
