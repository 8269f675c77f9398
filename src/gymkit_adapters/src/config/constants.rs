/// Access tokens are deliberately short-lived; an expired one is renewed
/// transparently through the refresh endpoint.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;

/// Refresh tokens outlive access tokens by orders of magnitude; rotation
/// bounds the damage of a leaked one.
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 14 * 24 * 60 * 60;

pub const DEFAULT_PORT: u16 = 3001;
