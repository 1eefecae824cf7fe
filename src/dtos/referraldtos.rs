use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::referralmodel::{Referral, ReferralStats, ReferralStatus, ReferralWithUser},
    utils::display,
};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateReferralDto {
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub status: Option<ReferralStatus>,
    #[validate(range(min = 0, message = "Reward cannot be negative"))]
    pub reward: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferredUserDto {
    pub id: Uuid,
    pub referred_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub status: String,
    pub reward: i64,
    pub joined: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ReferredUserDto {
    pub fn from_row(row: &ReferralWithUser) -> Self {
        ReferredUserDto {
            id: row.id,
            referred_id: row.referred_id,
            name: display::text_or(row.referred_name.as_deref(), display::UNKNOWN),
            email: display::text_or(row.referred_email.as_deref(), display::NO_EMAIL),
            is_verified: row.referred_is_verified.unwrap_or(false),
            status: row.status.label().to_string(),
            reward: row.reward,
            joined: display::format_date(row.referred_joined_at),
            created_at: row.created_at,
        }
    }
}

/// A user's referral edges together with the counts derived from them.
#[derive(Debug, Clone)]
pub struct ReferralSummary {
    pub referrals: Vec<ReferralWithUser>,
    pub stats: ReferralStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralSummaryResponseDto {
    pub status: String,
    pub referrals: Vec<ReferredUserDto>,
    pub stats: ReferralStats,
}

impl ReferralSummaryResponseDto {
    pub fn from_summary(summary: &ReferralSummary) -> Self {
        ReferralSummaryResponseDto {
            status: "success".to_string(),
            referrals: summary.referrals.iter().map(ReferredUserDto::from_row).collect(),
            stats: summary.stats.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReferralResponseDto {
    pub status: String,
    /// False when the pair was already recorded.
    pub created: bool,
    pub referral: Option<Referral>,
}
