pub mod display;
pub mod password;
pub mod token;
