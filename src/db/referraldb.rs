// db/referraldb.rs
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::referralmodel::{
    NewReferral, Referral, ReferralRow, ReferralStatus, ReferralWithUser,
};

#[async_trait]
pub trait ReferralExt {
    /// `None` when the (referrer, referred) pair is already recorded. An edge
    /// recorded as completed credits the referrer in the same transaction.
    async fn create_referral(&self, referral: NewReferral) -> Result<Option<Referral>, sqlx::Error>;

    async fn get_referral(&self, referral_id: Uuid) -> Result<Option<Referral>, sqlx::Error>;

    async fn get_user_referrals(&self, user_id: Uuid) -> Result<Vec<ReferralWithUser>, sqlx::Error>;

    /// Pending -> completed, crediting the referrer's balance and earnings
    /// with the reward. `None` when missing or not pending.
    async fn complete_referral(&self, referral_id: Uuid) -> Result<Option<Referral>, sqlx::Error>;

    async fn get_all_referrals(&self) -> Result<Vec<ReferralRow>, sqlx::Error>;
}

#[async_trait]
impl ReferralExt for DBClient {
    async fn create_referral(&self, referral: NewReferral) -> Result<Option<Referral>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Referral>(
            r#"
            INSERT INTO referrals (referrer_id, referred_id, status, reward)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (referrer_id, referred_id) DO NOTHING
            RETURNING id, referrer_id, referred_id, status, reward, created_at, updated_at
            "#,
        )
        .bind(referral.referrer_id)
        .bind(referral.referred_id)
        .bind(referral.status)
        .bind(referral.reward)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(created) = created else {
            return Ok(None);
        };

        if created.status == ReferralStatus::Completed {
            credit_referrer(&mut tx, created.referrer_id, created.reward).await?;
        }

        tx.commit().await?;

        Ok(Some(created))
    }

    async fn get_referral(&self, referral_id: Uuid) -> Result<Option<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT id, referrer_id, referred_id, status, reward, created_at, updated_at
            FROM referrals
            WHERE id = $1
            "#,
        )
        .bind(referral_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_referrals(&self, user_id: Uuid) -> Result<Vec<ReferralWithUser>, sqlx::Error> {
        sqlx::query_as::<_, ReferralWithUser>(
            r#"
            SELECT
                r.id, r.referred_id, r.status, r.reward, r.created_at,
                u.name AS referred_name,
                u.email AS referred_email,
                u.is_verified AS referred_is_verified,
                u.created_at AS referred_joined_at
            FROM referrals r
            LEFT JOIN users u ON r.referred_id = u.id
            WHERE r.referrer_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn complete_referral(&self, referral_id: Uuid) -> Result<Option<Referral>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let referral = sqlx::query_as::<_, Referral>(
            r#"
            UPDATE referrals
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, referrer_id, referred_id, status, reward, created_at, updated_at
            "#,
        )
        .bind(referral_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(referral) = referral else {
            return Ok(None);
        };

        credit_referrer(&mut tx, referral.referrer_id, referral.reward).await?;

        tx.commit().await?;

        Ok(Some(referral))
    }

    async fn get_all_referrals(&self) -> Result<Vec<ReferralRow>, sqlx::Error> {
        sqlx::query_as::<_, ReferralRow>(
            r#"
            SELECT
                r.id, r.referrer_id, r.referred_id, r.status, r.reward, r.created_at,
                referrer.name AS referrer_name,
                referrer.email AS referrer_email,
                referred.name AS referred_name,
                referred.email AS referred_email
            FROM referrals r
            LEFT JOIN users referrer ON r.referrer_id = referrer.id
            LEFT JOIN users referred ON r.referred_id = referred.id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

async fn credit_referrer(
    tx: &mut Transaction<'_, Postgres>,
    referrer_id: Uuid,
    reward: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET balance = balance + $2,
            total_earnings = total_earnings + $2,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(referrer_id)
    .bind(reward)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
