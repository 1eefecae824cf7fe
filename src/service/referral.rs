use rand::{distr::Alphanumeric, Rng};

pub const REFERRAL_CODE_LENGTH: usize = 8;

/// Attempts made before a registration gives up on finding a free code.
pub const MAX_CODE_ATTEMPTS: usize = 5;

pub fn generate_referral_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(REFERRAL_CODE_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

pub fn generate_referral_link(base_url: &str, code: &str) -> String {
    format!("{}/register?ref={}", base_url.trim_end_matches('/'), code)
}
