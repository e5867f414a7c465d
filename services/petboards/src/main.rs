use anyhow::Result;
use common::database::{DatabaseConfig, health_check, init_pool};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use petboards::{
    AppState, config::AppConfig, create_router, repositories::run_migrations,
    security::TokenService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting petboards service");

    let config = AppConfig::from_env().inspect_err(|e| {
        error!("Refusing to start: {:#}", e);
    })?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;
    info!("Database migrations applied");

    let token_service = TokenService::new(&config.secret, config.token_ttl);
    let app = create_router(AppState::with_postgres(pool, token_service));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Petboards service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
