use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::usermodel::User;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_proof_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentProofStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaymentProofStatus {
    pub fn label(&self) -> &str {
        match self {
            PaymentProofStatus::Pending => "Pending",
            PaymentProofStatus::Approved => "Approved",
            PaymentProofStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PaymentProof {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub status: PaymentProofStatus,
    pub admin_id: Option<Uuid>,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of an admin review: the updated proof and its owner.
#[derive(Debug, Clone)]
pub struct ReviewedPaymentProof {
    pub payment_proof: PaymentProof,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PaymentProofRow {
    pub id: Uuid,
    pub image_url: String,
    pub status: PaymentProofStatus,
    pub admin_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_telegram: Option<String>,
    pub admin_id: Option<Uuid>,
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
}
