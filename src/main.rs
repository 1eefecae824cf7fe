mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::{str::FromStr, sync::Arc, time::Duration};

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use service::{
    admin_service::AdminService, referral_service::ReferralService,
    registration_service::RegistrationService, verification_service::VerificationService,
    withdraw_service::WithdrawService,
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub registration_service: Arc<RegistrationService>,
    pub verification_service: Arc<VerificationService>,
    pub referral_service: Arc<ReferralService>,
    pub withdraw_service: Arc<WithdrawService>,
    pub admin_service: Arc<AdminService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let registration_service = Arc::new(RegistrationService::new(
            db_client_arc.clone(),
            config.referral_reward,
        ));
        let verification_service = Arc::new(VerificationService::new(db_client_arc.clone()));
        let referral_service = Arc::new(ReferralService::new(
            db_client_arc.clone(),
            config.app_url.clone(),
        ));
        let withdraw_service = Arc::new(WithdrawService::new(db_client_arc.clone()));
        let admin_service = Arc::new(AdminService::new(db_client_arc.clone()));

        Self {
            env: config,
            db_client: db_client_arc,
            registration_service,
            verification_service,
            referral_service,
            withdraw_service,
            admin_service,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::DEBUG))
        .init();

    let pool = match PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!(
                "Connected to the database (max connections: {})",
                config.db_max_connections
            );
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    if let Err(err) = db_client.migrate().await {
        tracing::error!("Failed to run migrations: {}", err);
        std::process::exit(1);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
