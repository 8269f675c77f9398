pub mod dashmap_refresh_token_store;
pub mod hashmap_client_store;
pub mod hashmap_exercise_store;
pub mod hashmap_notification_store;
pub mod hashmap_trainer_store;
pub mod postgres_client_store;
pub mod postgres_trainer_store;
pub mod redis_refresh_token_store;
