// service/withdraw_service.rs
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{db::DBClient, RewardStore},
    dtos::withdrawdtos::WithdrawRequestDto,
    models::walletmodels::{NewWithdrawRequest, WithdrawRequest, WithdrawStatus},
    service::error::ServiceError,
};

pub struct WithdrawService<S: RewardStore = DBClient> {
    db_client: Arc<S>,
}

impl<S: RewardStore> WithdrawService<S> {
    pub fn new(db_client: Arc<S>) -> Self {
        Self { db_client }
    }

    /// Reserves `amount` from the user's balance and files a pending request.
    pub async fn request_withdrawal(
        &self,
        user_id: Uuid,
        body: WithdrawRequestDto,
    ) -> Result<WithdrawRequest, ServiceError> {
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let user = self
            .db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        if user.balance < body.amount {
            return Err(ServiceError::InsufficientBalance {
                requested: body.amount,
                available: user.balance,
            });
        }

        let request = NewWithdrawRequest {
            user_id,
            method: body.method.trim().to_string(),
            amount: body.amount,
            account_info: body.account_info.trim().to_string(),
        };

        match self.db_client.create_withdraw_request(request).await? {
            Some(created) => {
                info!(
                    "Withdraw request {} for {} filed by {}",
                    created.id, created.amount, user_id
                );
                Ok(created)
            }
            // Balance moved between the read and the reservation.
            None => {
                let available = self
                    .db_client
                    .get_user(Some(user_id), None, None)
                    .await?
                    .map(|u| u.balance)
                    .unwrap_or(0);
                Err(ServiceError::InsufficientBalance {
                    requested: body.amount,
                    available,
                })
            }
        }
    }

    /// Completes or rejects a pending request. Rejection refunds the reserved amount.
    pub async fn process_withdrawal(
        &self,
        request_id: Uuid,
        status: WithdrawStatus,
    ) -> Result<WithdrawRequest, ServiceError> {
        if status == WithdrawStatus::Pending {
            return Err(ServiceError::Validation(
                "Withdrawal status must be completed or rejected".to_string(),
            ));
        }

        let existing = self
            .db_client
            .get_withdraw_request(request_id)
            .await?
            .ok_or(ServiceError::WithdrawRequestNotFound(request_id))?;

        if existing.status != WithdrawStatus::Pending {
            return Err(ServiceError::WithdrawAlreadyProcessed(request_id));
        }

        let processed = self
            .db_client
            .process_withdraw_request(request_id, status)
            .await?
            .ok_or(ServiceError::WithdrawAlreadyProcessed(request_id))?;

        info!(
            "Withdraw request {} marked {}",
            processed.id,
            processed.status.label().to_lowercase()
        );
        Ok(processed)
    }

    pub async fn get_user_withdrawals(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WithdrawRequest>, ServiceError> {
        Ok(self.db_client.get_user_withdraw_requests(user_id).await?)
    }
}
