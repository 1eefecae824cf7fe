use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::walletmodels::WithdrawStatus;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequestDto {
    #[validate(length(min = 1, max = 50, message = "Withdrawal method is required"))]
    pub method: String,

    /// Minor units
    #[validate(range(min = 1, message = "Amount must be greater than zero"))]
    pub amount: i64,

    #[validate(length(min = 1, max = 500, message = "Account information is required"))]
    pub account_info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessWithdrawalDto {
    pub status: WithdrawStatus,
}
