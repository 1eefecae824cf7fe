use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "withdraw_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WithdrawStatus {
    Pending,
    Completed,
    Rejected,
}

impl WithdrawStatus {
    pub fn label(&self) -> &str {
        match self {
            WithdrawStatus::Pending => "Pending",
            WithdrawStatus::Completed => "Completed",
            WithdrawStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct WithdrawRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub method: String,
    pub amount: i64,
    pub account_info: String,
    pub status: WithdrawStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawRequest {
    pub user_id: Uuid,
    pub method: String,
    pub amount: i64,
    pub account_info: String,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct WithdrawRequestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub method: String,
    pub amount: i64,
    pub account_info: String,
    pub status: WithdrawStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}
