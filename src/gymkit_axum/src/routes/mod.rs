pub mod client_login;
pub mod clients;
pub mod error;
pub mod exercises;
pub mod notifications;
pub mod refresh_token;
pub mod register;
pub mod trainer_login;

pub use client_login::client_login;
pub use clients::{create_client, delete_client, list_clients, log_workout, update_client};
pub use exercises::{get_exercises, replace_exercises};
pub use notifications::{clear_notifications, create_notification, list_notifications};
pub use refresh_token::refresh_token;
pub use register::register_trainer;
pub use trainer_login::trainer_login;

use serde::Serialize;

use gymkit_application::LoginSession;
use gymkit_core::PrincipalProfile;

/// Wire shape shared by login and registration responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PrincipalProfile,
}

impl From<LoginSession> for SessionResponse {
    fn from(session: LoginSession) -> Self {
        Self {
            access_token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
            user: session.user,
        }
    }
}
