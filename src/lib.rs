//! # Gymkit - Gym-Management Backend Library
//!
//! This is a facade crate that re-exports the public APIs of all gymkit
//! components. Use this crate to get access to the whole backend in one
//! place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Trainer`, `Client`, `Role`, `TokenPair`, etc.
//! - **Port traits**: `TrainerStore`, `ClientStore`, `RefreshTokenStore`,
//!   `CredentialHasher`, `TokenIssuer`, `TokenVerifier`
//! - **Use cases**: `ClientLoginUseCase`, `RefreshSessionUseCase`, etc.
//! - **Adapters**: `JwtTokenService`, `Argon2CredentialHasher`,
//!   `PostgresTrainerStore`, `RedisRefreshTokenStore`, etc.
//! - **Session client**: `SessionClient` - the retry-on-expiry protocol
//! - **Service**: `GymService` - the assembled HTTP backend

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use gymkit_core::*;
}

// Re-export most commonly used core types at the root level
pub use gymkit_core::{
    AuthenticatedPrincipal, Client, ClientView, Email, Notification, Password, PrincipalId,
    PrincipalProfile, RefreshRecord, Role, TokenPair, TokenRejection, Trainer,
};

// ============================================================================
// Port Traits
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use gymkit_core::{
        ClientStore, ClientStoreError, CredentialHasher, ExerciseLibraryStore, ExerciseStoreError,
        NotificationStore, NotificationStoreError, PasswordHashError, RefreshTokenStore,
        RefreshTokenStoreError, TokenIssueError, TokenIssuer, TokenVerifier, TrainerStore,
        TrainerStoreError,
    };
}

// Re-export port traits at root level
pub use gymkit_core::{
    ClientStore, CredentialHasher, ExerciseLibraryStore, NotificationStore, RefreshTokenStore,
    TokenIssuer, TokenVerifier, TrainerStore,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use gymkit_application::*;
}

// Re-export use cases at root level
pub use gymkit_application::{
    ClientLoginUseCase, LoginSession, RefreshSessionUseCase, RegisterTrainerUseCase,
    TrainerLoginUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Token and password-hashing services
    pub mod auth {
        pub use gymkit_adapters::auth::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use gymkit_adapters::persistence::*;
    }

    /// Configuration
    pub mod config {
        pub use gymkit_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use gymkit_adapters::{
    Argon2CredentialHasher, DashMapRefreshTokenStore, HashMapClientStore, HashMapExerciseStore,
    HashMapNotificationStore, HashMapTrainerStore, JwtConfig, JwtTokenService,
    PostgresClientStore, PostgresTrainerStore, RedisRefreshTokenStore,
};

// ============================================================================
// HTTP Surface
// ============================================================================

/// Axum routes, extraction and error mapping
pub mod http {
    pub use gymkit_axum::*;
}

pub use gymkit_axum::{ApiError, BearerToken};

// ============================================================================
// Session Client
// ============================================================================

/// Client-side session lifecycle (login, token storage, retry-on-expiry)
pub mod session {
    pub use gymkit_session::*;
}

pub use gymkit_session::{ApiRequest, SessionClient, SessionStore, SessionTokens};

// ============================================================================
// Gym Service (Main Entry Point)
// ============================================================================

/// Main assembled service
pub use gymkit_service::{GymService, configure_postgres, get_redis_client};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

/// Re-export the web framework and runtime for downstream wiring
pub use axum;
pub use tokio;
