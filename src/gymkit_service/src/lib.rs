pub mod gym_service;
pub mod tracing;

pub use gym_service::{GymService, configure_postgres, get_redis_client};
