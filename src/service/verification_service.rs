// service/verification_service.rs
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, RewardStore},
    dtos::userdtos::VerificationStatusDto,
    models::{
        usermodel::User,
        verificationmodels::{PaymentProofStatus, ReviewedPaymentProof},
    },
    service::error::ServiceError,
};

pub struct VerificationService<S: RewardStore = DBClient> {
    db_client: Arc<S>,
}

impl<S: RewardStore> VerificationService<S> {
    pub fn new(db_client: Arc<S>) -> Self {
        Self { db_client }
    }

    /// Moves a pending proof to `approved` or `rejected`. Approval verifies
    /// the owner in the same transaction. Ids that are not UUIDs resolve to
    /// no proof at all.
    pub async fn review_payment_proof(
        &self,
        proof_id: &str,
        status: PaymentProofStatus,
        admin_id: Uuid,
        admin_note: Option<String>,
    ) -> Result<ReviewedPaymentProof, ServiceError> {
        if status == PaymentProofStatus::Pending {
            return Err(ServiceError::Validation(
                "Review status must be approved or rejected".to_string(),
            ));
        }

        let proof_uuid = Uuid::parse_str(proof_id.trim())
            .map_err(|_| ServiceError::PaymentProofNotFound(proof_id.to_string()))?;

        let existing = self
            .db_client
            .get_payment_proof(proof_uuid)
            .await?
            .ok_or_else(|| ServiceError::PaymentProofNotFound(proof_id.to_string()))?;

        let reviewer = self
            .db_client
            .get_user(Some(admin_id), None, None)
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        if !reviewer.is_admin() {
            return Err(ServiceError::Unauthorized);
        }

        if existing.status != PaymentProofStatus::Pending {
            return Err(ServiceError::ProofAlreadyReviewed(proof_uuid));
        }

        let admin_note = admin_note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        // A concurrent review may have won between the read and the update.
        let payment_proof = self
            .db_client
            .review_payment_proof(proof_uuid, status, admin_id, admin_note)
            .await?
            .ok_or(ServiceError::ProofAlreadyReviewed(proof_uuid))?;

        let user = self
            .db_client
            .get_user(Some(payment_proof.user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(payment_proof.user_id))?;

        info!(
            "Payment proof {} {} by admin {}",
            payment_proof.id,
            payment_proof.status.label().to_lowercase(),
            admin_id
        );

        Ok(ReviewedPaymentProof {
            payment_proof,
            user,
        })
    }

    pub async fn update_user_verification_status(
        &self,
        user_id: Uuid,
        is_verified: bool,
    ) -> Result<User, ServiceError> {
        let user = self
            .db_client
            .update_user_verification_status(user_id, is_verified)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        info!("User {} verification set to {}", user.id, user.is_verified);
        Ok(user)
    }

    pub async fn get_verification_status(
        &self,
        user_id: Uuid,
    ) -> Result<VerificationStatusDto, ServiceError> {
        let user = self
            .db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        let latest = self.db_client.get_latest_payment_proof(user_id).await?;

        Ok(VerificationStatusDto::from_latest_proof(
            user.is_verified,
            latest.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memorydb::MemoryStore, dtos::userdtos::RegisterUserDto,
        models::usermodel::UserRole, service::registration_service::RegistrationService,
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        service: VerificationService<MemoryStore>,
        admin: User,
        user_id: Uuid,
        proof_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let admin = store.seed_user("Root", "root@x.com", UserRole::Admin);
        let receipt = RegistrationService::new(store.clone(), 500)
            .register_with_payment_proof(RegisterUserDto {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                phone: "+1".to_string(),
                password: "secret1".to_string(),
                image_url: "https://files.example.com/proofs/a.png".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        Fixture {
            service: VerificationService::new(store.clone()),
            store,
            admin,
            user_id: receipt.user_id,
            proof_id: receipt.payment_proof_id,
        }
    }

    fn is_verified(store: &MemoryStore, user_id: Uuid) -> bool {
        store
            .users()
            .into_iter()
            .find(|u| u.id == user_id)
            .map(|u| u.is_verified)
            .unwrap()
    }

    #[tokio::test]
    async fn test_approval_verifies_owner() {
        let f = fixture().await;

        let reviewed = f
            .service
            .review_payment_proof(
                &f.proof_id.to_string(),
                PaymentProofStatus::Approved,
                f.admin.id,
                Some("Looks good".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(reviewed.payment_proof.status, PaymentProofStatus::Approved);
        assert_eq!(reviewed.payment_proof.admin_id, Some(f.admin.id));
        assert_eq!(reviewed.payment_proof.admin_note.as_deref(), Some("Looks good"));
        assert!(reviewed.user.is_verified);
        assert!(is_verified(&f.store, f.user_id));
    }

    #[tokio::test]
    async fn test_rejection_leaves_owner_unverified() {
        let f = fixture().await;

        let reviewed = f
            .service
            .review_payment_proof(
                &f.proof_id.to_string(),
                PaymentProofStatus::Rejected,
                f.admin.id,
                None,
            )
            .await
            .unwrap();

        assert_eq!(reviewed.payment_proof.status, PaymentProofStatus::Rejected);
        assert!(!reviewed.user.is_verified);
        assert!(!is_verified(&f.store, f.user_id));
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_id_is_not_found() {
        let f = fixture().await;

        let malformed = f
            .service
            .review_payment_proof("missing-id", PaymentProofStatus::Approved, f.admin.id, None)
            .await;
        assert!(matches!(malformed, Err(ServiceError::PaymentProofNotFound(_))));

        let unknown = f
            .service
            .review_payment_proof(
                &Uuid::new_v4().to_string(),
                PaymentProofStatus::Approved,
                f.admin.id,
                None,
            )
            .await;
        assert!(matches!(unknown, Err(ServiceError::PaymentProofNotFound(_))));
        assert!(!is_verified(&f.store, f.user_id));
    }

    #[tokio::test]
    async fn test_missing_proof_is_reported_before_reviewer() {
        let f = fixture().await;

        let result = f
            .service
            .review_payment_proof("missing-id", PaymentProofStatus::Approved, Uuid::new_v4(), None)
            .await;

        assert!(matches!(result, Err(ServiceError::PaymentProofNotFound(_))));
    }

    #[tokio::test]
    async fn test_review_is_terminal() {
        let f = fixture().await;
        let proof_id = f.proof_id.to_string();

        f.service
            .review_payment_proof(&proof_id, PaymentProofStatus::Rejected, f.admin.id, None)
            .await
            .unwrap();

        let second = f
            .service
            .review_payment_proof(&proof_id, PaymentProofStatus::Approved, f.admin.id, None)
            .await;

        assert!(matches!(second, Err(ServiceError::ProofAlreadyReviewed(_))));
        assert!(!is_verified(&f.store, f.user_id));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_review() {
        let f = fixture().await;

        let result = f
            .service
            .review_payment_proof(
                &f.proof_id.to_string(),
                PaymentProofStatus::Approved,
                f.user_id,
                None,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert!(!is_verified(&f.store, f.user_id));
    }

    #[tokio::test]
    async fn test_pending_is_not_a_review_outcome() {
        let f = fixture().await;

        let result = f
            .service
            .review_payment_proof(
                &f.proof_id.to_string(),
                PaymentProofStatus::Pending,
                f.admin.id,
                None,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_failed_verification_update_rolls_back_review() {
        let f = fixture().await;
        f.store.fail_on("mark_user_verified");

        let result = f
            .service
            .review_payment_proof(
                &f.proof_id.to_string(),
                PaymentProofStatus::Approved,
                f.admin.id,
                None,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::StorageUnavailable(_))));
        assert_eq!(f.store.payment_proofs()[0].status, PaymentProofStatus::Pending);
        assert!(!is_verified(&f.store, f.user_id));
    }

    #[tokio::test]
    async fn test_verification_flag_update_and_status() {
        let f = fixture().await;

        let status = f.service.get_verification_status(f.user_id).await.unwrap();
        assert!(!status.is_verified);
        assert_eq!(status.proof_status, "Pending");

        let user = f
            .service
            .update_user_verification_status(f.user_id, true)
            .await
            .unwrap();
        assert!(user.is_verified);

        let missing = f
            .service
            .update_user_verification_status(Uuid::new_v4(), true)
            .await;
        assert!(matches!(missing, Err(ServiceError::UserNotFound(_))));
    }
}
