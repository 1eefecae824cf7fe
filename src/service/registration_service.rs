// service/registration_service.rs
use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::{
    db::{db::DBClient, RewardStore},
    dtos::{
        admindtos::CreateUserDto,
        userdtos::{RegisterUserDto, RegistrationReceipt},
    },
    models::usermodel::{NewRegistration, NewUser, User, UserRole},
    service::{
        error::ServiceError,
        referral::{generate_referral_code, MAX_CODE_ATTEMPTS},
    },
    utils::password,
};

pub struct RegistrationService<S: RewardStore = DBClient> {
    db_client: Arc<S>,
    referral_reward: i64,
}

impl<S: RewardStore> RegistrationService<S> {
    pub fn new(db_client: Arc<S>, referral_reward: i64) -> Self {
        Self {
            db_client,
            referral_reward,
        }
    }

    /// Creates an unverified user and its pending payment proof in one
    /// transaction. A supplied referral code also records the referral edge.
    pub async fn register_with_payment_proof(
        &self,
        mut body: RegisterUserDto,
    ) -> Result<RegistrationReceipt, ServiceError> {
        body.email = normalize_email(&body.email);
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let email = body.email.clone();
        self.ensure_email_free(&email).await?;

        let referrer_id = match body
            .referral_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
        {
            Some(code) => {
                let referrer = self
                    .db_client
                    .get_user(None, None, Some(&code.to_uppercase()))
                    .await?
                    .ok_or(ServiceError::InvalidReferralCode)?;
                Some(referrer.id)
            }
            None => None,
        };

        let hashed_password = password::hash(&body.password)?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let registration = NewRegistration {
                name: body.name.trim().to_string(),
                email: email.clone(),
                phone: body.phone.trim().to_string(),
                telegram_username: clean_optional(body.telegram_username.as_deref()),
                password: hashed_password.clone(),
                referral_code: generate_referral_code(),
                image_url: body.image_url.trim().to_string(),
                referrer_id,
                referral_reward: self.referral_reward,
            };

            if let Some(registered) = self
                .db_client
                .save_user_with_payment_proof(registration)
                .await?
            {
                info!(
                    "Registered user {} with payment proof {}",
                    registered.user.id, registered.payment_proof.id
                );
                return Ok(RegistrationReceipt {
                    user_id: registered.user.id,
                    payment_proof_id: registered.payment_proof.id,
                });
            }

            // Nothing was written: either the email was taken by a concurrent
            // registration or the generated referral code collided.
            self.ensure_email_free(&email).await?;
            warn!("Referral code collision on registration attempt {}", attempt);
        }

        Err(ServiceError::Other(
            "Could not allocate a unique referral code".to_string(),
        ))
    }

    /// Admin-created accounts are verified immediately and carry no payment proof.
    pub async fn create_user(&self, mut body: CreateUserDto) -> Result<User, ServiceError> {
        body.email = normalize_email(&body.email);
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let email = body.email.clone();
        self.ensure_email_free(&email).await?;

        let hashed_password = password::hash(&body.password)?;
        let role = body.role.unwrap_or(UserRole::User);

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_user = NewUser {
                name: body.name.trim().to_string(),
                email: email.clone(),
                phone: clean_optional(body.phone.as_deref()),
                telegram_username: clean_optional(body.telegram_username.as_deref()),
                password: hashed_password.clone(),
                role,
                referral_code: generate_referral_code(),
            };

            if let Some(user) = self.db_client.save_verified_user(new_user).await? {
                info!("Admin created {} account {}", user.role.to_str(), user.id);
                return Ok(user);
            }

            self.ensure_email_free(&email).await?;
            warn!("Referral code collision on user creation attempt {}", attempt);
        }

        Err(ServiceError::Other(
            "Could not allocate a unique referral code".to_string(),
        ))
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), ServiceError> {
        match self.db_client.get_user(None, Some(email), None).await? {
            Some(_) => Err(ServiceError::DuplicateEmail(email.to_string())),
            None => Ok(()),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
