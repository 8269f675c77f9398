//! The per-call retry state machine.
//!
//! Expressing the flow as an enum plus a transition function makes the two
//! load-bearing guarantees structural rather than conventional: at most one
//! refresh happens per call, and a failed refresh lands in a terminal
//! logged-out state.

/// Where a single protected call currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Nothing has happened yet; token storage has not been consulted.
    Idle,
    /// The original request is in flight with the held access token.
    Attempt1,
    /// The access token was rejected as expired; the refresh token is being
    /// exchanged.
    Refreshing,
    /// The original request is being replayed once with the renewed token.
    Attempt2,
    /// A final response is available for the caller.
    Done,
    /// Terminal: both tokens are gone and the caller gets no data.
    LoggedOut,
}

/// What the driver observed since the last transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEvent {
    TokensLoaded,
    TokensMissing,
    GotUnauthorized,
    GotResponse,
    RefreshSucceeded,
    RefreshFailed,
}

/// Pure transition function; the driver in [`crate::client`] feeds it one
/// event per step.
pub fn advance(state: CallState, event: CallEvent) -> CallState {
    match (state, event) {
        (CallState::Idle, CallEvent::TokensLoaded) => CallState::Attempt1,
        // With no session held there is no point in a guaranteed-401 round
        // trip; the call short-circuits before touching the network.
        (CallState::Idle, CallEvent::TokensMissing) => CallState::LoggedOut,

        (CallState::Attempt1, CallEvent::GotUnauthorized) => CallState::Refreshing,
        (CallState::Attempt1, CallEvent::GotResponse) => CallState::Done,

        (CallState::Refreshing, CallEvent::RefreshSucceeded) => CallState::Attempt2,
        (CallState::Refreshing, CallEvent::RefreshFailed) => CallState::LoggedOut,

        // The retry is final. Even another rejection settles the call, which
        // is what bounds the machine to a single refresh.
        (CallState::Attempt2, _) => CallState::Done,

        // Terminal states absorb everything.
        (CallState::Done, _) => CallState::Done,
        (CallState::LoggedOut, _) => CallState::LoggedOut,

        // Combinations the driver never produces; staying put keeps the
        // function total.
        (state, _) => state,
    }
}
