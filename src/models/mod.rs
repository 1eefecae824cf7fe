pub mod referralmodel;
pub mod usermodel;
pub mod verificationmodels;
pub mod walletmodels;
