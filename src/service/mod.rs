pub mod admin_service;
pub mod error;
pub mod referral;
pub mod referral_service;
pub mod registration_service;
pub mod verification_service;
pub mod withdraw_service;
