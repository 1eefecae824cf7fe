// db/statsdb.rs
use async_trait::async_trait;

use super::db::DBClient;

use crate::models::referralmodel::ReferralActivityRow;

#[async_trait]
pub trait AdminStatsExt {
    async fn count_non_admin_users(&self) -> Result<i64, sqlx::Error>;

    async fn count_completed_referrals(&self) -> Result<i64, sqlx::Error>;

    async fn sum_completed_withdrawals(&self) -> Result<i64, sqlx::Error>;

    async fn get_recent_referral_activity(
        &self,
        limit: i64,
    ) -> Result<Vec<ReferralActivityRow>, sqlx::Error>;
}

#[async_trait]
impl AdminStatsExt for DBClient {
    async fn count_non_admin_users(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM users WHERE role <> 'admin'"#)
            .fetch_one(&self.pool)
            .await
    }

    async fn count_completed_referrals(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM referrals WHERE status = 'completed'"#)
            .fetch_one(&self.pool)
            .await
    }

    async fn sum_completed_withdrawals(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM withdraw_requests
            WHERE status = 'completed'
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_recent_referral_activity(
        &self,
        limit: i64,
    ) -> Result<Vec<ReferralActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, ReferralActivityRow>(
            r#"
            SELECT
                referrer.name AS referrer_name,
                referred.name AS referred_name,
                r.status,
                r.created_at
            FROM referrals r
            LEFT JOIN users referrer ON r.referrer_id = referrer.id
            LEFT JOIN users referred ON r.referred_id = referred.id
            ORDER BY r.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
