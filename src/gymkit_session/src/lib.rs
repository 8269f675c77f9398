//! Client-side session lifecycle for the gym-management API.
//!
//! A logged-in session is a pair of tokens held in injected storage. Every
//! protected call runs through an explicit state machine that attaches the
//! access token, refreshes it once on an expiry rejection, retries the
//! original request once, and tears the session down when the refresh token
//! itself is rejected.
//!
//! ```text
//! ┌──────┐ tokens held ┌──────────┐ 401 ┌────────────┐ ok  ┌──────────┐
//! │ Idle ├────────────►│ Attempt1 ├────►│ Refreshing ├────►│ Attempt2 │
//! └──┬───┘             └────┬─────┘     └─────┬──────┘     └────┬─────┘
//!    │ no tokens            │ response        │ refresh failed  │ any response
//!    ▼                      ▼                 ▼                 ▼
//! LoggedOut               Done            LoggedOut           Done
//! ```

pub mod client;
pub mod protocol;
pub mod store;

// Re-export for convenience
pub use client::{ApiRequest, SessionClient, SessionError};
pub use protocol::{CallEvent, CallState, advance};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError, SessionTokens};
