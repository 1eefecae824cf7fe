// service/admin_service.rs
use std::sync::Arc;

use tracing::warn;

use crate::{
    db::{db::DBClient, query_timeout::QueryTimeout, RewardStore},
    dtos::admindtos::{
        AdminStats, PaymentProofListItem, RecentActivity, ReferralListItem, UserListItem,
        WithdrawListItem,
    },
    models::usermodel::UserRole,
};

pub const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Dashboard reads. Every query degrades to zero or an empty list when the
/// store fails, so one broken query never blanks the whole dashboard.
pub struct AdminService<S: RewardStore = DBClient> {
    db_client: Arc<S>,
}

impl<S: RewardStore> AdminService<S> {
    pub fn new(db_client: Arc<S>) -> Self {
        Self { db_client }
    }

    pub async fn get_admin_stats(&self) -> AdminStats {
        let db = &self.db_client;
        let (total_users, active_referrals, total_payouts, recent) = tokio::join!(
            QueryTimeout::execute_with_timeout(
                db.count_non_admin_users(),
                QueryTimeout::AGGREGATION_TIMEOUT
            ),
            QueryTimeout::execute_with_timeout(
                db.count_completed_referrals(),
                QueryTimeout::AGGREGATION_TIMEOUT
            ),
            QueryTimeout::execute_with_timeout(
                db.sum_completed_withdrawals(),
                QueryTimeout::AGGREGATION_TIMEOUT
            ),
            QueryTimeout::execute_with_timeout(
                db.get_recent_referral_activity(RECENT_ACTIVITY_LIMIT),
                QueryTimeout::AGGREGATION_TIMEOUT
            ),
        );

        AdminStats {
            total_users: or_degraded(total_users, "total users"),
            active_referrals: or_degraded(active_referrals, "completed referrals"),
            total_payouts: or_degraded(total_payouts, "total payouts"),
            recent_activities: or_degraded(recent, "recent activity")
                .iter()
                .map(RecentActivity::from_row)
                .collect(),
        }
    }

    pub async fn get_all_users(&self) -> Vec<UserListItem> {
        self.users_with_role(UserRole::User, "users").await
    }

    pub async fn get_all_admins(&self) -> Vec<UserListItem> {
        self.users_with_role(UserRole::Admin, "admins").await
    }

    pub async fn get_all_referrals(&self) -> Vec<ReferralListItem> {
        let rows = QueryTimeout::execute_with_timeout(
            self.db_client.get_all_referrals(),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await;

        or_degraded(rows, "referrals")
            .iter()
            .map(ReferralListItem::from_row)
            .collect()
    }

    pub async fn get_all_payment_proofs(&self) -> Vec<PaymentProofListItem> {
        let rows = QueryTimeout::execute_with_timeout(
            self.db_client.get_all_payment_proofs(),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await;

        or_degraded(rows, "payment proofs")
            .iter()
            .map(PaymentProofListItem::from_row)
            .collect()
    }

    pub async fn get_all_withdraw_requests(&self) -> Vec<WithdrawListItem> {
        let rows = QueryTimeout::execute_with_timeout(
            self.db_client.get_all_withdraw_requests(),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await;

        or_degraded(rows, "withdraw requests")
            .iter()
            .map(WithdrawListItem::from_row)
            .collect()
    }

    async fn users_with_role(&self, role: UserRole, what: &str) -> Vec<UserListItem> {
        let users = QueryTimeout::execute_with_timeout(
            self.db_client.get_users_by_role(role),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await;

        or_degraded(users, what)
            .iter()
            .map(UserListItem::from_user)
            .collect()
    }
}

fn or_degraded<T: Default>(result: Result<T, sqlx::Error>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to load {}: {}", what, e);
        T::default()
    })
}
