pub mod db;
pub mod paymentproofdb;
pub mod query_timeout;
pub mod referraldb;
pub mod statsdb;
pub mod userdb;
pub mod withdrawdb;

#[cfg(test)]
pub mod memorydb;

use paymentproofdb::PaymentProofExt;
use referraldb::ReferralExt;
use statsdb::AdminStatsExt;
use userdb::UserExt;
use withdrawdb::WithdrawExt;

/// Everything the services need from persistence. `DBClient` is the
/// production implementation.
pub trait RewardStore:
    UserExt + PaymentProofExt + ReferralExt + WithdrawExt + AdminStatsExt + Send + Sync + 'static
{
}

impl<T> RewardStore for T where
    T: UserExt + PaymentProofExt + ReferralExt + WithdrawExt + AdminStatsExt + Send + Sync + 'static
{
}
