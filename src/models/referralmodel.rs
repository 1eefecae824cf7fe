use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "referral_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Completed,
}

impl ReferralStatus {
    pub fn label(&self) -> &str {
        match self {
            ReferralStatus::Pending => "Pending",
            ReferralStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Referral {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub status: ReferralStatus,
    pub reward: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReferral {
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub status: ReferralStatus,
    pub reward: i64,
}

/// A referral edge seen from the referrer, with the referred user's public fields.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ReferralWithUser {
    pub id: Uuid,
    pub referred_id: Uuid,
    pub status: ReferralStatus,
    pub reward: i64,
    pub created_at: DateTime<Utc>,
    pub referred_name: Option<String>,
    pub referred_email: Option<String>,
    pub referred_is_verified: Option<bool>,
    pub referred_joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ReferralStats {
    pub total_referrals: i64,
    pub successful_referrals: i64,
    pub pending_referrals: i64,
    pub total_earned: i64,
}

impl ReferralStats {
    pub fn from_referrals(referrals: &[ReferralWithUser]) -> Self {
        referrals.iter().fold(ReferralStats::default(), |mut stats, referral| {
            stats.total_referrals += 1;
            match referral.status {
                ReferralStatus::Completed => {
                    stats.successful_referrals += 1;
                    stats.total_earned += referral.reward;
                }
                ReferralStatus::Pending => stats.pending_referrals += 1,
            }
            stats
        })
    }
}

/// Admin listing row; names come from outer joins and may be missing.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ReferralRow {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub status: ReferralStatus,
    pub reward: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub referrer_name: Option<String>,
    pub referrer_email: Option<String>,
    pub referred_name: Option<String>,
    pub referred_email: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ReferralActivityRow {
    pub referrer_name: Option<String>,
    pub referred_name: Option<String>,
    pub status: ReferralStatus,
    pub created_at: Option<DateTime<Utc>>,
}
