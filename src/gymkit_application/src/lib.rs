pub mod use_cases;

// Re-export use cases at the crate root for convenience
pub use use_cases::{
    client_login::{ClientLoginError, ClientLoginUseCase},
    issue_session::IssueSessionError,
    refresh_session::{RefreshSessionError, RefreshSessionUseCase},
    register_trainer::{RegisterTrainerError, RegisterTrainerUseCase},
    session::LoginSession,
    trainer_login::{TrainerLoginError, TrainerLoginUseCase},
};
