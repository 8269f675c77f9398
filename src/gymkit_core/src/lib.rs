pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    notification::Notification,
    password::{Password, PasswordError},
    principal::{
        Client, ClientUpdate, ClientView, PrincipalId, PrincipalProfile, Trainer, WorkoutLog,
    },
    role::Role,
    token::{AuthenticatedPrincipal, RefreshRecord, TokenPair, TokenRejection},
};

pub use ports::{
    repositories::{
        ClientStore, ClientStoreError, ExerciseLibraryStore, ExerciseStoreError,
        NotificationStore, NotificationStoreError, RefreshTokenStore, RefreshTokenStoreError,
        TrainerStore, TrainerStoreError,
    },
    services::{
        CredentialHasher, PasswordHashError, TokenIssueError, TokenIssuer, TokenVerifier,
    },
};
