//! Axum surface for the gym-management backend.
//!
//! Route handlers are generic over the store and token-service ports defined
//! in `gymkit_core`; each route receives exactly the state it needs. The
//! actual authentication logic lives in `gymkit_application` use cases.

pub mod extract;
pub mod routes;

// Re-export for convenience
pub use extract::{BearerToken, authorize};
pub use routes::error::{ApiError, ErrorResponse};
