// db/withdrawdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::walletmodels::{
    NewWithdrawRequest, WithdrawRequest, WithdrawRequestRow, WithdrawStatus,
};

#[async_trait]
pub trait WithdrawExt {
    /// Reserves `amount` from the user's balance and records a pending
    /// request. `None` when the balance does not cover the amount.
    async fn create_withdraw_request(
        &self,
        request: NewWithdrawRequest,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error>;

    async fn get_withdraw_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error>;

    async fn get_user_withdraw_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WithdrawRequest>, sqlx::Error>;

    /// Settles a pending request; a rejection returns the reserved amount to
    /// the user. `None` when missing or not pending.
    async fn process_withdraw_request(
        &self,
        request_id: Uuid,
        status: WithdrawStatus,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error>;

    async fn get_all_withdraw_requests(&self) -> Result<Vec<WithdrawRequestRow>, sqlx::Error>;
}

#[async_trait]
impl WithdrawExt for DBClient {
    async fn create_withdraw_request(
        &self,
        request: NewWithdrawRequest,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let reserved = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - $2, updated_at = NOW()
            WHERE id = $1 AND balance >= $2
            "#,
        )
        .bind(request.user_id)
        .bind(request.amount)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            return Ok(None);
        }

        let withdraw_request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            INSERT INTO withdraw_requests (user_id, method, amount, account_info, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, user_id, method, amount, account_info, status, created_at, updated_at
            "#,
        )
        .bind(request.user_id)
        .bind(&request.method)
        .bind(request.amount)
        .bind(&request.account_info)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(withdraw_request))
    }

    async fn get_withdraw_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error> {
        sqlx::query_as::<_, WithdrawRequest>(
            r#"
            SELECT id, user_id, method, amount, account_info, status, created_at, updated_at
            FROM withdraw_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_withdraw_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WithdrawRequest>, sqlx::Error> {
        sqlx::query_as::<_, WithdrawRequest>(
            r#"
            SELECT id, user_id, method, amount, account_info, status, created_at, updated_at
            FROM withdraw_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn process_withdraw_request(
        &self,
        request_id: Uuid,
        status: WithdrawStatus,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let withdraw_request = sqlx::query_as::<_, WithdrawRequest>(
            r#"
            UPDATE withdraw_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user_id, method, amount, account_info, status, created_at, updated_at
            "#,
        )
        .bind(request_id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(withdraw_request) = withdraw_request else {
            return Ok(None);
        };

        if status == WithdrawStatus::Rejected {
            sqlx::query(
                r#"
                UPDATE users
                SET balance = balance + $2, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(withdraw_request.user_id)
            .bind(withdraw_request.amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(withdraw_request))
    }

    async fn get_all_withdraw_requests(&self) -> Result<Vec<WithdrawRequestRow>, sqlx::Error> {
        sqlx::query_as::<_, WithdrawRequestRow>(
            r#"
            SELECT
                w.id, w.user_id, w.method, w.amount, w.account_info, w.status, w.created_at,
                u.name AS user_name,
                u.email AS user_email
            FROM withdraw_requests w
            LEFT JOIN users u ON w.user_id = u.id
            ORDER BY w.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
