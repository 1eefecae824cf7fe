// config.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub jwt_maxage: i64,
    pub port: u16,
    /// Reward credited to a referrer when a referral completes, in minor units
    pub referral_reward: i64,
    pub db_max_connections: u32,
    pub log_level: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;
        let jwt_maxage = parse("JWT_MAXAGE", required("JWT_MAXAGE")?)?;
        let app_url = required("APP_URL")?;

        let port = parse("PORT", optional("PORT", "8000"))?;
        let referral_reward: i64 = parse("REFERRAL_REWARD", optional("REFERRAL_REWARD", "500"))?;
        if referral_reward < 0 {
            return Err(ConfigError::Invalid {
                name: "REFERRAL_REWARD",
                value: referral_reward.to_string(),
            });
        }
        let db_max_connections = parse("DB_MAX_CONNECTIONS", optional("DB_MAX_CONNECTIONS", "10"))?;
        let log_level = optional("LOG_LEVEL", "debug");

        let cors_origins = optional("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            database_url,
            app_url: app_url.trim_end_matches('/').to_string(),
            jwt_secret,
            jwt_maxage,
            port,
            referral_reward,
            db_max_connections,
            log_level,
            cors_origins,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { name, value })
}
