use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{principal::PrincipalId, role::Role};

/// The token pair handed to a client on login, registration and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// The identity asserted by a verified access token. Role and id are both
/// embedded in the token payload, so no store lookup is needed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub id: PrincipalId,
    pub role: Role,
}

/// Why an access token was rejected. Only `Expired` is recoverable: the
/// client may exchange its refresh token and retry. `Malformed` covers
/// parse and signature failures and must force a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Malformed,
}

/// Server-side record backing an opaque refresh token. Stored keyed by the
/// token string; removed atomically when the token is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshRecord {
    pub principal_id: PrincipalId,
    pub role: Role,
    /// Unix timestamp (seconds) past which the token is no longer honored.
    pub expires_at: i64,
}

impl RefreshRecord {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}
