// service/referral_service.rs
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, RewardStore},
    dtos::referraldtos::ReferralSummary,
    models::referralmodel::{NewReferral, Referral, ReferralStats, ReferralStatus},
    service::{error::ServiceError, referral::generate_referral_link},
};

pub struct ReferralService<S: RewardStore = DBClient> {
    db_client: Arc<S>,
    app_url: String,
}

impl<S: RewardStore> ReferralService<S> {
    pub fn new(db_client: Arc<S>, app_url: String) -> Self {
        Self {
            db_client,
            app_url,
        }
    }

    /// Records a referral edge. Returns `None` when the pair already exists.
    /// An edge recorded as completed credits the referrer on insert.
    pub async fn create_referral(
        &self,
        referral: NewReferral,
    ) -> Result<Option<Referral>, ServiceError> {
        if referral.referrer_id == referral.referred_id {
            return Err(ServiceError::Validation(
                "A user cannot refer themselves".to_string(),
            ));
        }

        if referral.reward < 0 {
            return Err(ServiceError::Validation(
                "Reward cannot be negative".to_string(),
            ));
        }

        for user_id in [referral.referrer_id, referral.referred_id] {
            self.db_client
                .get_user(Some(user_id), None, None)
                .await?
                .ok_or(ServiceError::UserNotFound(user_id))?;
        }

        let created = self.db_client.create_referral(referral).await?;

        match &created {
            Some(r) => info!("Referral {} recorded: {} -> {}", r.id, r.referrer_id, r.referred_id),
            None => info!("Referral pair already recorded, nothing to do"),
        }

        Ok(created)
    }

    pub async fn get_user_referrals(&self, user_id: Uuid) -> Result<ReferralSummary, ServiceError> {
        let referrals = self.db_client.get_user_referrals(user_id).await?;
        let stats = ReferralStats::from_referrals(&referrals);

        Ok(ReferralSummary { referrals, stats })
    }

    /// `pending -> completed`, crediting the referrer's balance with the
    /// edge's reward in the same transaction.
    pub async fn complete_referral(&self, referral_id: Uuid) -> Result<Referral, ServiceError> {
        let existing = self
            .db_client
            .get_referral(referral_id)
            .await?
            .ok_or(ServiceError::ReferralNotFound(referral_id))?;

        if existing.status == ReferralStatus::Completed {
            return Err(ServiceError::ReferralAlreadyCompleted(referral_id));
        }

        let completed = self
            .db_client
            .complete_referral(referral_id)
            .await?
            .ok_or(ServiceError::ReferralAlreadyCompleted(referral_id))?;

        info!(
            "Referral {} completed, credited {} to {}",
            completed.id, completed.reward, completed.referrer_id
        );
        Ok(completed)
    }

    pub async fn get_referral_link(&self, user_id: Uuid) -> Result<String, ServiceError> {
        let user = self
            .db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        Ok(generate_referral_link(&self.app_url, &user.referral_code))
    }
}
