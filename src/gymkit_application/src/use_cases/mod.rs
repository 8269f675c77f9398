pub mod client_login;
pub mod issue_session;
pub mod refresh_session;
pub mod register_trainer;
pub mod session;
pub mod trainer_login;
