use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod image_store;
mod jwt;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod validation;

use aws_config::BehaviorVersion;
use common::database::{DatabaseConfig, health_check, init_pool};

use crate::{
    image_store::{ImageStore, ImageStoreConfig},
    jwt::{JwtConfig, JwtService},
    rate_limiter::{LoginRateLimiter, RateLimiterConfig},
    repositories::{AccountRepository, ArtworkRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub account_repository: AccountRepository,
    pub artwork_repository: ArtworkRepository,
    pub image_store: ImageStore,
    pub rate_limiter: LoginRateLimiter,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting gallery service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    // Initialize the S3 image store
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);
    let image_store = ImageStore::new(s3_client, ImageStoreConfig::from_env()?);

    let account_repository = AccountRepository::new(pool.clone());
    let artwork_repository = ArtworkRepository::new(pool);
    let rate_limiter = LoginRateLimiter::new(RateLimiterConfig::default());

    info!("Gallery service initialized successfully");

    let app_state = AppState {
        jwt_service,
        account_repository,
        artwork_repository,
        image_store,
        rate_limiter,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Gallery service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
