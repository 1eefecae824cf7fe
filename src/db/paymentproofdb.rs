// db/paymentproofdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::verificationmodels::{PaymentProof, PaymentProofRow, PaymentProofStatus};

#[async_trait]
pub trait PaymentProofExt {
    async fn get_payment_proof(&self, proof_id: Uuid) -> Result<Option<PaymentProof>, sqlx::Error>;

    /// The most recently submitted proof of a user.
    async fn get_latest_payment_proof(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PaymentProof>, sqlx::Error>;

    /// Moves a pending proof to `status`. Approval also marks the owner
    /// verified, in the same transaction. `None` when the proof does not
    /// exist or was already reviewed.
    async fn review_payment_proof(
        &self,
        proof_id: Uuid,
        status: PaymentProofStatus,
        admin_id: Uuid,
        admin_note: Option<String>,
    ) -> Result<Option<PaymentProof>, sqlx::Error>;

    async fn get_all_payment_proofs(&self) -> Result<Vec<PaymentProofRow>, sqlx::Error>;
}

#[async_trait]
impl PaymentProofExt for DBClient {
    async fn get_payment_proof(&self, proof_id: Uuid) -> Result<Option<PaymentProof>, sqlx::Error> {
        sqlx::query_as::<_, PaymentProof>(
            r#"
            SELECT id, user_id, image_url, status, admin_id, admin_note, created_at, updated_at
            FROM payment_proofs
            WHERE id = $1
            "#,
        )
        .bind(proof_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_latest_payment_proof(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PaymentProof>, sqlx::Error> {
        sqlx::query_as::<_, PaymentProof>(
            r#"
            SELECT id, user_id, image_url, status, admin_id, admin_note, created_at, updated_at
            FROM payment_proofs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn review_payment_proof(
        &self,
        proof_id: Uuid,
        status: PaymentProofStatus,
        admin_id: Uuid,
        admin_note: Option<String>,
    ) -> Result<Option<PaymentProof>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let proof = sqlx::query_as::<_, PaymentProof>(
            r#"
            UPDATE payment_proofs
            SET status = $2, admin_id = $3, admin_note = $4, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user_id, image_url, status, admin_id, admin_note, created_at, updated_at
            "#,
        )
        .bind(proof_id)
        .bind(status)
        .bind(admin_id)
        .bind(admin_note)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(proof) = proof else {
            return Ok(None);
        };

        if status == PaymentProofStatus::Approved {
            sqlx::query(
                r#"
                UPDATE users
                SET is_verified = true, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(proof.user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(proof))
    }

    async fn get_all_payment_proofs(&self) -> Result<Vec<PaymentProofRow>, sqlx::Error> {
        sqlx::query_as::<_, PaymentProofRow>(
            r#"
            SELECT
                p.id, p.image_url, p.status, p.admin_note, p.created_at,
                u.id AS user_id,
                u.name AS user_name,
                u.email AS user_email,
                u.telegram_username AS user_telegram,
                a.id AS admin_id,
                a.name AS admin_name,
                a.email AS admin_email
            FROM payment_proofs p
            LEFT JOIN users u ON p.user_id = u.id
            LEFT JOIN users a ON p.admin_id = a.id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
