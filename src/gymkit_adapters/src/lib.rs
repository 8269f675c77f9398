pub mod auth;
pub mod config;
pub mod persistence;

// Re-export the commonly wired adapters at the crate root
pub use auth::{
    argon2_hasher::Argon2CredentialHasher,
    jwt::{JwtConfig, JwtTokenService},
};
pub use persistence::{
    dashmap_refresh_token_store::DashMapRefreshTokenStore,
    hashmap_client_store::HashMapClientStore,
    hashmap_exercise_store::HashMapExerciseStore,
    hashmap_notification_store::HashMapNotificationStore,
    hashmap_trainer_store::HashMapTrainerStore,
    postgres_client_store::PostgresClientStore,
    postgres_trainer_store::PostgresTrainerStore,
    redis_refresh_token_store::RedisRefreshTokenStore,
};
