use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::verificationmodels::PaymentProof;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn label(&self) -> &str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Suspended => "Suspended",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub telegram_username: Option<String>,
    pub password: String,
    pub role: UserRole,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,

    /// Withdrawable reward amount, in minor units
    pub balance: i64,
    pub total_earnings: i64,
    pub is_verified: bool,
    pub status: UserStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Self-registration: the user row plus its pending payment proof.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub telegram_username: Option<String>,
    pub password: String,
    pub referral_code: String,
    pub image_url: String,
    pub referrer_id: Option<Uuid>,
    pub referral_reward: i64,
}

/// Admin-created account, verified from the start.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub telegram_username: Option<String>,
    pub password: String,
    pub role: UserRole,
    pub referral_code: String,
}

#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub payment_proof: PaymentProof,
}
