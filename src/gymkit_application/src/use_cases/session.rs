use gymkit_core::{PrincipalProfile, TokenPair};

/// What a successful login or registration hands back: a fresh token pair
/// and the sanitized principal. The password hash cannot appear here.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub tokens: TokenPair,
    pub user: PrincipalProfile,
}
