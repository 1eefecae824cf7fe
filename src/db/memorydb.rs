// db/memorydb.rs
//
// In-memory stand-in for `DBClient` used by the service tests. Multi-row
// writes are staged on copies and swapped in at the end, so an injected
// failure in the middle leaves the state untouched, like a rolled back
// transaction.
use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use super::{
    paymentproofdb::PaymentProofExt, referraldb::ReferralExt, statsdb::AdminStatsExt,
    userdb::UserExt, withdrawdb::WithdrawExt,
};
use crate::models::{
    referralmodel::{
        NewReferral, Referral, ReferralActivityRow, ReferralRow, ReferralStatus, ReferralWithUser,
    },
    usermodel::{NewRegistration, NewUser, RegisteredUser, User, UserRole, UserStatus},
    verificationmodels::{PaymentProof, PaymentProofRow, PaymentProofStatus},
    walletmodels::{NewWithdrawRequest, WithdrawRequest, WithdrawRequestRow, WithdrawStatus},
};

#[derive(Default)]
struct MemoryState {
    clock: i64,
    users: Vec<User>,
    payment_proofs: Vec<PaymentProof>,
    referrals: Vec<Referral>,
    withdraw_requests: Vec<WithdrawRequest>,
}

impl MemoryState {
    /// Strictly increasing timestamps keep "newest first" deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000 + self.clock, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    fn user(&self, user_id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn is_taken(&self, email: &str, referral_code: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email || u.referral_code == referral_code)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    failures: Mutex<HashSet<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `operation` fail as if the pool were gone.
    pub fn fail_on(&self, operation: &'static str) {
        self.failures.lock().unwrap().insert(operation);
    }

    fn check(&self, operation: &'static str) -> Result<(), sqlx::Error> {
        if self.failures.lock().unwrap().contains(operation) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    pub fn seed_user(&self, name: &str, email: &str, role: UserRole) -> User {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            telegram_username: None,
            password: "not-a-real-hash".to_string(),
            role,
            referral_code: format!("SEED{:04}", state.clock),
            referred_by: None,
            balance: 0,
            total_earnings: 0,
            is_verified: role == UserRole::Admin,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        user
    }

    pub fn set_balance(&self, user_id: Uuid, balance: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.balance = balance;
        }
    }

    pub fn seed_withdraw_request(
        &self,
        user_id: Uuid,
        amount: i64,
        status: WithdrawStatus,
    ) -> WithdrawRequest {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let request = WithdrawRequest {
            id: Uuid::new_v4(),
            user_id,
            method: "bank".to_string(),
            amount,
            account_info: "0001112223".to_string(),
            status,
            created_at: now,
            updated_at: now,
        };
        state.withdraw_requests.push(request.clone());
        request
    }

    pub fn users(&self) -> Vec<User> {
        self.state.lock().unwrap().users.clone()
    }

    pub fn referrals(&self) -> Vec<Referral> {
        self.state.lock().unwrap().referrals.clone()
    }

    pub fn payment_proofs(&self) -> Vec<PaymentProof> {
        self.state.lock().unwrap().payment_proofs.clone()
    }
}

#[async_trait]
impl UserExt for MemoryStore {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        self.check("get_user")?;
        let state = self.state.lock().unwrap();

        let user = if let Some(user_id) = user_id {
            state.user(user_id).cloned()
        } else if let Some(email) = email {
            state.users.iter().find(|u| u.email == email).cloned()
        } else if let Some(code) = referral_code {
            state.users.iter().find(|u| u.referral_code == code).cloned()
        } else {
            None
        };

        Ok(user)
    }

    async fn get_users_by_role(&self, role: UserRole) -> Result<Vec<User>, sqlx::Error> {
        self.check("get_users_by_role")?;
        let state = self.state.lock().unwrap();
        let mut users: Vec<User> = state.users.iter().filter(|u| u.role == role).cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn save_user_with_payment_proof(
        &self,
        registration: NewRegistration,
    ) -> Result<Option<RegisteredUser>, sqlx::Error> {
        self.check("save_user_with_payment_proof")?;
        let mut state = self.state.lock().unwrap();

        if state.is_taken(&registration.email, &registration.referral_code) {
            return Ok(None);
        }

        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            name: registration.name,
            email: registration.email,
            phone: Some(registration.phone),
            telegram_username: registration.telegram_username,
            password: registration.password,
            role: UserRole::User,
            referral_code: registration.referral_code,
            referred_by: registration.referrer_id,
            balance: 0,
            total_earnings: 0,
            is_verified: false,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let mut users = state.users.clone();
        users.push(user.clone());

        self.check("insert_payment_proof")?;
        let payment_proof = PaymentProof {
            id: Uuid::new_v4(),
            user_id: user.id,
            image_url: registration.image_url,
            status: PaymentProofStatus::Pending,
            admin_id: None,
            admin_note: None,
            created_at: now,
            updated_at: now,
        };

        let mut referrals = state.referrals.clone();
        if let Some(referrer_id) = registration.referrer_id {
            let exists = referrals
                .iter()
                .any(|r| r.referrer_id == referrer_id && r.referred_id == user.id);
            if !exists {
                referrals.push(Referral {
                    id: Uuid::new_v4(),
                    referrer_id,
                    referred_id: user.id,
                    status: ReferralStatus::Pending,
                    reward: registration.referral_reward,
                    created_at: now,
                    updated_at: now,
                });
            }
        }

        state.users = users;
        state.referrals = referrals;
        state.payment_proofs.push(payment_proof.clone());

        Ok(Some(RegisteredUser {
            user,
            payment_proof,
        }))
    }

    async fn save_verified_user(&self, new_user: NewUser) -> Result<Option<User>, sqlx::Error> {
        self.check("save_verified_user")?;
        let mut state = self.state.lock().unwrap();

        if state.is_taken(&new_user.email, &new_user.referral_code) {
            return Ok(None);
        }

        let now = state.tick();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            telegram_username: new_user.telegram_username,
            password: new_user.password,
            role: new_user.role,
            referral_code: new_user.referral_code,
            referred_by: None,
            balance: 0,
            total_earnings: 0,
            is_verified: true,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(Some(user))
    }

    async fn update_user_verification_status(
        &self,
        user_id: Uuid,
        is_verified: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        self.check("update_user_verification_status")?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        Ok(state.users.iter_mut().find(|u| u.id == user_id).map(|user| {
            user.is_verified = is_verified;
            user.updated_at = now;
            user.clone()
        }))
    }
}

#[async_trait]
impl PaymentProofExt for MemoryStore {
    async fn get_payment_proof(&self, proof_id: Uuid) -> Result<Option<PaymentProof>, sqlx::Error> {
        self.check("get_payment_proof")?;
        let state = self.state.lock().unwrap();
        Ok(state.payment_proofs.iter().find(|p| p.id == proof_id).cloned())
    }

    async fn get_latest_payment_proof(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PaymentProof>, sqlx::Error> {
        self.check("get_latest_payment_proof")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .payment_proofs
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn review_payment_proof(
        &self,
        proof_id: Uuid,
        status: PaymentProofStatus,
        admin_id: Uuid,
        admin_note: Option<String>,
    ) -> Result<Option<PaymentProof>, sqlx::Error> {
        self.check("review_payment_proof")?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        let mut proofs = state.payment_proofs.clone();
        let Some(proof) = proofs
            .iter_mut()
            .find(|p| p.id == proof_id && p.status == PaymentProofStatus::Pending)
        else {
            return Ok(None);
        };
        proof.status = status;
        proof.admin_id = Some(admin_id);
        proof.admin_note = admin_note;
        proof.updated_at = now;
        let reviewed = proof.clone();

        let mut users = state.users.clone();
        if status == PaymentProofStatus::Approved {
            self.check("mark_user_verified")?;
            if let Some(user) = users.iter_mut().find(|u| u.id == reviewed.user_id) {
                user.is_verified = true;
                user.updated_at = now;
            }
        }

        state.payment_proofs = proofs;
        state.users = users;
        Ok(Some(reviewed))
    }

    async fn get_all_payment_proofs(&self) -> Result<Vec<PaymentProofRow>, sqlx::Error> {
        self.check("get_all_payment_proofs")?;
        let state = self.state.lock().unwrap();

        let mut rows: Vec<PaymentProofRow> = state
            .payment_proofs
            .iter()
            .map(|p| {
                let owner = state.user(p.user_id);
                let admin = p.admin_id.and_then(|id| state.user(id));
                PaymentProofRow {
                    id: p.id,
                    image_url: p.image_url.clone(),
                    status: p.status,
                    admin_note: p.admin_note.clone(),
                    created_at: Some(p.created_at),
                    user_id: owner.map(|u| u.id),
                    user_name: owner.map(|u| u.name.clone()),
                    user_email: owner.map(|u| u.email.clone()),
                    user_telegram: owner.and_then(|u| u.telegram_username.clone()),
                    admin_id: admin.map(|a| a.id),
                    admin_name: admin.map(|a| a.name.clone()),
                    admin_email: admin.map(|a| a.email.clone()),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl ReferralExt for MemoryStore {
    async fn create_referral(&self, referral: NewReferral) -> Result<Option<Referral>, sqlx::Error> {
        self.check("create_referral")?;
        let mut state = self.state.lock().unwrap();

        let exists = state
            .referrals
            .iter()
            .any(|r| r.referrer_id == referral.referrer_id && r.referred_id == referral.referred_id);
        if exists {
            return Ok(None);
        }

        let now = state.tick();
        let created = Referral {
            id: Uuid::new_v4(),
            referrer_id: referral.referrer_id,
            referred_id: referral.referred_id,
            status: referral.status,
            reward: referral.reward,
            created_at: now,
            updated_at: now,
        };

        let mut users = state.users.clone();
        if created.status == ReferralStatus::Completed {
            self.check("credit_referrer")?;
            if let Some(referrer) = users.iter_mut().find(|u| u.id == created.referrer_id) {
                referrer.balance += created.reward;
                referrer.total_earnings += created.reward;
                referrer.updated_at = now;
            }
        }

        state.referrals.push(created.clone());
        state.users = users;
        Ok(Some(created))
    }

    async fn get_referral(&self, referral_id: Uuid) -> Result<Option<Referral>, sqlx::Error> {
        self.check("get_referral")?;
        let state = self.state.lock().unwrap();
        Ok(state.referrals.iter().find(|r| r.id == referral_id).cloned())
    }

    async fn get_user_referrals(&self, user_id: Uuid) -> Result<Vec<ReferralWithUser>, sqlx::Error> {
        self.check("get_user_referrals")?;
        let state = self.state.lock().unwrap();

        let mut rows: Vec<ReferralWithUser> = state
            .referrals
            .iter()
            .filter(|r| r.referrer_id == user_id)
            .map(|r| {
                let referred = state.user(r.referred_id);
                ReferralWithUser {
                    id: r.id,
                    referred_id: r.referred_id,
                    status: r.status,
                    reward: r.reward,
                    created_at: r.created_at,
                    referred_name: referred.map(|u| u.name.clone()),
                    referred_email: referred.map(|u| u.email.clone()),
                    referred_is_verified: referred.map(|u| u.is_verified),
                    referred_joined_at: referred.map(|u| u.created_at),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn complete_referral(&self, referral_id: Uuid) -> Result<Option<Referral>, sqlx::Error> {
        self.check("complete_referral")?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        let mut referrals = state.referrals.clone();
        let Some(referral) = referrals
            .iter_mut()
            .find(|r| r.id == referral_id && r.status == ReferralStatus::Pending)
        else {
            return Ok(None);
        };
        referral.status = ReferralStatus::Completed;
        referral.updated_at = now;
        let completed = referral.clone();

        self.check("credit_referrer")?;
        let mut users = state.users.clone();
        if let Some(referrer) = users.iter_mut().find(|u| u.id == completed.referrer_id) {
            referrer.balance += completed.reward;
            referrer.total_earnings += completed.reward;
            referrer.updated_at = now;
        }

        state.referrals = referrals;
        state.users = users;
        Ok(Some(completed))
    }

    async fn get_all_referrals(&self) -> Result<Vec<ReferralRow>, sqlx::Error> {
        self.check("get_all_referrals")?;
        let state = self.state.lock().unwrap();

        let mut rows: Vec<ReferralRow> = state
            .referrals
            .iter()
            .map(|r| {
                let referrer = state.user(r.referrer_id);
                let referred = state.user(r.referred_id);
                ReferralRow {
                    id: r.id,
                    referrer_id: r.referrer_id,
                    referred_id: r.referred_id,
                    status: r.status,
                    reward: r.reward,
                    created_at: Some(r.created_at),
                    referrer_name: referrer.map(|u| u.name.clone()),
                    referrer_email: referrer.map(|u| u.email.clone()),
                    referred_name: referred.map(|u| u.name.clone()),
                    referred_email: referred.map(|u| u.email.clone()),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl WithdrawExt for MemoryStore {
    async fn create_withdraw_request(
        &self,
        request: NewWithdrawRequest,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error> {
        self.check("create_withdraw_request")?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        let mut users = state.users.clone();
        let Some(user) = users
            .iter_mut()
            .find(|u| u.id == request.user_id && u.balance >= request.amount)
        else {
            return Ok(None);
        };
        user.balance -= request.amount;
        user.updated_at = now;

        let created = WithdrawRequest {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            method: request.method,
            amount: request.amount,
            account_info: request.account_info,
            status: WithdrawStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        state.users = users;
        state.withdraw_requests.push(created.clone());
        Ok(Some(created))
    }

    async fn get_withdraw_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error> {
        self.check("get_withdraw_request")?;
        let state = self.state.lock().unwrap();
        Ok(state.withdraw_requests.iter().find(|w| w.id == request_id).cloned())
    }

    async fn get_user_withdraw_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WithdrawRequest>, sqlx::Error> {
        self.check("get_user_withdraw_requests")?;
        let state = self.state.lock().unwrap();
        let mut requests: Vec<WithdrawRequest> = state
            .withdraw_requests
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn process_withdraw_request(
        &self,
        request_id: Uuid,
        status: WithdrawStatus,
    ) -> Result<Option<WithdrawRequest>, sqlx::Error> {
        self.check("process_withdraw_request")?;
        let mut state = self.state.lock().unwrap();
        let now = state.tick();

        let mut requests = state.withdraw_requests.clone();
        let Some(request) = requests
            .iter_mut()
            .find(|w| w.id == request_id && w.status == WithdrawStatus::Pending)
        else {
            return Ok(None);
        };
        request.status = status;
        request.updated_at = now;
        let processed = request.clone();

        let mut users = state.users.clone();
        if status == WithdrawStatus::Rejected {
            if let Some(user) = users.iter_mut().find(|u| u.id == processed.user_id) {
                user.balance += processed.amount;
                user.updated_at = now;
            }
        }

        state.withdraw_requests = requests;
        state.users = users;
        Ok(Some(processed))
    }

    async fn get_all_withdraw_requests(&self) -> Result<Vec<WithdrawRequestRow>, sqlx::Error> {
        self.check("get_all_withdraw_requests")?;
        let state = self.state.lock().unwrap();

        let mut rows: Vec<WithdrawRequestRow> = state
            .withdraw_requests
            .iter()
            .map(|w| {
                let owner = state.user(w.user_id);
                WithdrawRequestRow {
                    id: w.id,
                    user_id: w.user_id,
                    method: w.method.clone(),
                    amount: w.amount,
                    account_info: w.account_info.clone(),
                    status: w.status,
                    created_at: Some(w.created_at),
                    user_name: owner.map(|u| u.name.clone()),
                    user_email: owner.map(|u| u.email.clone()),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl AdminStatsExt for MemoryStore {
    async fn count_non_admin_users(&self) -> Result<i64, sqlx::Error> {
        self.check("count_non_admin_users")?;
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().filter(|u| u.role != UserRole::Admin).count() as i64)
    }

    async fn count_completed_referrals(&self) -> Result<i64, sqlx::Error> {
        self.check("count_completed_referrals")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .referrals
            .iter()
            .filter(|r| r.status == ReferralStatus::Completed)
            .count() as i64)
    }

    async fn sum_completed_withdrawals(&self) -> Result<i64, sqlx::Error> {
        self.check("sum_completed_withdrawals")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .withdraw_requests
            .iter()
            .filter(|w| w.status == WithdrawStatus::Completed)
            .map(|w| w.amount)
            .sum())
    }

    async fn get_recent_referral_activity(
        &self,
        limit: i64,
    ) -> Result<Vec<ReferralActivityRow>, sqlx::Error> {
        self.check("get_recent_referral_activity")?;
        let state = self.state.lock().unwrap();

        let mut referrals: Vec<&Referral> = state.referrals.iter().collect();
        referrals.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(referrals
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|r| ReferralActivityRow {
                referrer_name: state.user(r.referrer_id).map(|u| u.name.clone()),
                referred_name: state.user(r.referred_id).map(|u| u.name.clone()),
                status: r.status,
                created_at: Some(r.created_at),
            })
            .collect())
    }
}
