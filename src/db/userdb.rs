// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::{
    usermodel::{NewRegistration, NewUser, RegisteredUser, User, UserRole},
    verificationmodels::PaymentProof,
};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    /// All users holding `role`, newest first.
    async fn get_users_by_role(&self, role: UserRole) -> Result<Vec<User>, sqlx::Error>;

    /// Inserts the user and its pending payment proof (and the referral edge,
    /// when referred) in one transaction. Returns `None` without writing
    /// anything when the email or referral code is already taken.
    async fn save_user_with_payment_proof(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<RegisteredUser>, sqlx::Error>;

    /// Same conflict semantics as `save_user_with_payment_proof`.
    async fn save_verified_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error>;

    async fn update_user_verification_status(
        &self,
        user_id: Uuid,
        is_verified: bool,
    ) -> Result<Option<User>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, phone, telegram_username, password,
                    role, referral_code, referred_by,
                    balance, total_earnings, is_verified, status,
                    created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, phone, telegram_username, password,
                    role, referral_code, referred_by,
                    balance, total_earnings, is_verified, status,
                    created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(referral_code) = referral_code {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, phone, telegram_username, password,
                    role, referral_code, referred_by,
                    balance, total_earnings, is_verified, status,
                    created_at, updated_at
                FROM users
                WHERE referral_code = $1
                "#,
            )
            .bind(referral_code)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users_by_role(&self, role: UserRole) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, phone, telegram_username, password,
                role, referral_code, referred_by,
                balance, total_earnings, is_verified, status,
                created_at, updated_at
            FROM users
            WHERE role = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_user_with_payment_proof(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<RegisteredUser>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (name, email, phone, telegram_username, password, role, referral_code, referred_by, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false)
            ON CONFLICT DO NOTHING
            RETURNING
                id, name, email, phone, telegram_username, password,
                role, referral_code, referred_by,
                balance, total_earnings, is_verified, status,
                created_at, updated_at
            "#,
        )
        .bind(&registration.name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(&registration.telegram_username)
        .bind(&registration.password)
        .bind(UserRole::User)
        .bind(&registration.referral_code)
        .bind(registration.referrer_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back.
        let Some(user) = user else {
            return Ok(None);
        };

        let payment_proof = sqlx::query_as::<_, PaymentProof>(
            r#"
            INSERT INTO payment_proofs (user_id, image_url, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, user_id, image_url, status, admin_id, admin_note, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&registration.image_url)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(referrer_id) = registration.referrer_id {
            sqlx::query(
                r#"
                INSERT INTO referrals (referrer_id, referred_id, status, reward)
                VALUES ($1, $2, 'pending', $3)
                ON CONFLICT (referrer_id, referred_id) DO NOTHING
                "#,
            )
            .bind(referrer_id)
            .bind(user.id)
            .bind(registration.referral_reward)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(RegisteredUser {
            user,
            payment_proof,
        }))
    }

    async fn save_verified_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (name, email, phone, telegram_username, password, role, referral_code, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, true)
            ON CONFLICT DO NOTHING
            RETURNING
                id, name, email, phone, telegram_username, password,
                role, referral_code, referred_by,
                balance, total_earnings, is_verified, status,
                created_at, updated_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.telegram_username)
        .bind(user.password)
        .bind(user.role)
        .bind(user.referral_code)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_user_verification_status(
        &self,
        user_id: Uuid,
        is_verified: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_verified = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, email, phone, telegram_username, password,
                role, referral_code, referred_by,
                balance, total_earnings, is_verified, status,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(is_verified)
        .fetch_optional(&self.pool)
        .await
    }
}
