use std::sync::Arc;

use color_eyre::eyre::Result;
use tokio::sync::RwLock;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gymkit_adapters::{
    Argon2CredentialHasher, HashMapExerciseStore, HashMapNotificationStore, JwtConfig,
    JwtTokenService, PostgresClientStore, PostgresTrainerStore, RedisRefreshTokenStore,
    config::Settings,
};
use gymkit_service::{GymService, configure_postgres, get_redis_client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Settings::load()?;

    // Setup database connection pool
    let pg_pool = configure_postgres(&config.postgres.url).await?;

    // Run migrations
    sqlx::migrate!().run(&pg_pool).await?;

    // Setup Redis connection
    let redis_client = get_redis_client(&config.redis.host_name)?;
    let redis_conn = Arc::new(RwLock::new(redis_client.get_connection()?));

    // Create stores
    let trainer_store = PostgresTrainerStore::new(pg_pool.clone());
    let client_store = PostgresClientStore::new(pg_pool);
    let refresh_token_store = RedisRefreshTokenStore::new(redis_conn);
    let exercise_store = HashMapExerciseStore::new();
    let notification_store = HashMapNotificationStore::new();

    // Token service
    let mut jwt_config = JwtConfig::new(config.auth.jwt_secret.clone());
    jwt_config.access_token_ttl_seconds = config.auth.access_token_ttl_seconds;
    jwt_config.refresh_token_ttl_seconds = config.auth.refresh_token_ttl_seconds;
    let token_service = JwtTokenService::new(jwt_config);

    let service = GymService::new(
        trainer_store,
        client_store,
        refresh_token_store,
        exercise_store,
        notification_store,
        Argon2CredentialHasher,
        token_service,
        config.server.assets_dir.clone(),
    );

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Starting gym service...");

    service
        .run_standalone(listener, config.auth.allowed_origins.clone())
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
