use std::time::Duration;

use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::protocol::{CallEvent, CallState, advance};
use crate::store::{SessionStore, SessionStoreError, SessionTokens};

/// An unbounded refresh hang would pin the retry and the apparent login
/// state with it, so the refresh call gets its own deadline.
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Login rejected: {0}")]
    LoginRejected(String),
    #[error("Refresh rejected")]
    RefreshRejected,
    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),
    #[error("Malformed server response: {0}")]
    MalformedResponse(String),
}

/// A protected request described by its parts, so the retry attempt can
/// rebuild it from scratch instead of cloning a consumed request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.body = Some(body);
        request
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut request = Self::new(Method::PUT, path);
        request.body = Some(body);
        request
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    access_token: String,
    refresh_token: String,
    user: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshPayload {
    access_token: String,
    // Present when the server rotates; absent means keep the current one.
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// Cooperative session client: callers await one wrapped call at a time and
/// receive either a settled response or `None` after a forced logout. No
/// background refresh runs; renewal is lazy, triggered only by an observed
/// rejection.
pub struct SessionClient<S> {
    http: HttpClient,
    base_url: String,
    store: S,
    refresh_timeout: Duration,
}

impl<S> SessionClient<S>
where
    S: SessionStore,
{
    pub fn new(base_url: impl Into<String>, store: S) -> Result<Self, SessionError> {
        let http = HttpClient::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            store,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        })
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in as a client (gym member). On success both tokens are persisted
    /// and the sanitized user payload is returned.
    pub async fn login_client(
        &self,
        name: &str,
        password: &str,
    ) -> Result<serde_json::Value, SessionError> {
        self.login_at(
            "/api/auth/client/login",
            json!({ "name": name, "password": password }),
        )
        .await
    }

    pub async fn login_trainer(
        &self,
        email: &str,
        password: &str,
    ) -> Result<serde_json::Value, SessionError> {
        self.login_at(
            "/api/auth/trainer/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn register_trainer(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<serde_json::Value, SessionError> {
        self.login_at(
            "/api/auth/trainer/register",
            json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    async fn login_at(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, SessionError> {
        let response = self.http.post(self.url(path)).json(&body).send().await?;

        if !response.status().is_success() {
            let message = response
                .json::<ErrorPayload>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| "login failed".to_owned());
            return Err(SessionError::LoginRejected(message));
        }

        let payload: SessionPayload = response
            .json()
            .await
            .map_err(|e| SessionError::MalformedResponse(e.to_string()))?;

        self.store
            .save(SessionTokens {
                access_token: payload.access_token,
                refresh_token: payload.refresh_token,
            })
            .await?;

        Ok(payload.user)
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool, SessionError> {
        Ok(self.store.load().await?.is_some())
    }

    /// Run one protected call through the retry state machine.
    ///
    /// Returns `Ok(Some(response))` with whatever the call finally settled
    /// on (the transparent refresh-and-retry already applied), or
    /// `Ok(None)` when the session was torn down - the caller never sees a
    /// stale intermediate response.
    #[tracing::instrument(
        name = "SessionClient::send",
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    pub async fn send(&self, request: ApiRequest) -> Result<Option<Response>, SessionError> {
        let mut state = CallState::Idle;
        let mut tokens: Option<SessionTokens> = None;
        let mut settled: Option<Response> = None;

        loop {
            state = match state {
                CallState::Idle => match self.store.load().await? {
                    Some(current) => {
                        tokens = Some(current);
                        advance(state, CallEvent::TokensLoaded)
                    }
                    None => {
                        tracing::debug!("no session held, skipping the network call");
                        advance(state, CallEvent::TokensMissing)
                    }
                },

                CallState::Attempt1 => {
                    let current = tokens.as_ref().expect("tokens are loaded before Attempt1");
                    let response = self.attempt(&request, &current.access_token).await?;

                    if response.status() == StatusCode::UNAUTHORIZED {
                        tracing::debug!("access token rejected, attempting refresh");
                        advance(state, CallEvent::GotUnauthorized)
                    } else {
                        settled = Some(response);
                        advance(state, CallEvent::GotResponse)
                    }
                }

                CallState::Refreshing => {
                    let current = tokens.as_ref().expect("tokens are held while refreshing");
                    match self.refresh(current).await {
                        Ok(renewed) => {
                            self.store.save(renewed.clone()).await?;
                            tokens = Some(renewed);
                            advance(state, CallEvent::RefreshSucceeded)
                        }
                        Err(error) => {
                            tracing::debug!(%error, "refresh failed, clearing the session");
                            self.store.clear().await?;
                            advance(state, CallEvent::RefreshFailed)
                        }
                    }
                }

                CallState::Attempt2 => {
                    let current = tokens.as_ref().expect("tokens are renewed before Attempt2");
                    let response = self.attempt(&request, &current.access_token).await?;
                    // Final either way; the machine permits no second refresh.
                    settled = Some(response);
                    advance(state, CallEvent::GotResponse)
                }

                CallState::Done => return Ok(settled),
                CallState::LoggedOut => return Ok(None),
            };
        }
    }

    async fn attempt(
        &self,
        request: &ApiRequest,
        access_token: &str,
    ) -> Result<Response, reqwest::Error> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .bearer_auth(access_token);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await
    }

    async fn refresh(&self, current: &SessionTokens) -> Result<SessionTokens, SessionError> {
        let response = self
            .http
            .post(self.url("/api/auth/client/refresh-token"))
            .timeout(self.refresh_timeout)
            .json(&json!({ "refreshToken": current.refresh_token }))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SessionError::RefreshRejected);
        }

        let payload: RefreshPayload = response
            .json()
            .await
            .map_err(|e| SessionError::MalformedResponse(e.to_string()))?;

        Ok(SessionTokens {
            access_token: payload.access_token,
            refresh_token: payload
                .refresh_token
                .unwrap_or_else(|| current.refresh_token.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::store::MemorySessionStore;

    use super::*;

    fn stale_tokens() -> SessionTokens {
        SessionTokens {
            access_token: "stale-access".to_owned(),
            refresh_token: "stale-refresh".to_owned(),
        }
    }

    async fn client_with(
        server: &MockServer,
    ) -> (SessionClient<MemorySessionStore>, MemorySessionStore) {
        let store = MemorySessionStore::new();
        let client = SessionClient::new(server.uri(), store.clone()).unwrap();
        (client, store)
    }

    #[tokio::test]
    async fn login_persists_both_tokens_and_returns_the_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/client/login"))
            .and(body_json(json!({ "name": "alex", "password": "correct" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "user": { "id": "client-1", "name": "alex", "role": "client" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        let user = client.login_client("alex", "correct").await.unwrap();

        assert_eq!(user["role"], "client");
        assert_eq!(
            store.load().await.unwrap(),
            Some(SessionTokens {
                access_token: "access-1".to_owned(),
                refresh_token: "refresh-1".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn rejected_login_leaves_no_session_behind() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/client/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "message": "Incorrect name or password" })),
            )
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        let result = client.login_client("alex", "wrong").await;

        assert!(matches!(result, Err(SessionError::LoginRejected(_))));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn a_valid_token_settles_on_the_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(header("Authorization", "Bearer stale-access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        store.save(stale_tokens()).await.unwrap();

        let response = client
            .send(ApiRequest::get("/api/notifications"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_and_the_call_retried_transparently() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(header("Authorization", "Bearer stale-access"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/client/refresh-token"))
            .and(body_json(json!({ "refreshToken": "stale-refresh" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "fresh-access",
                "refreshToken": "fresh-refresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(header("Authorization", "Bearer fresh-access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "notif-1" }])))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        store.save(stale_tokens()).await.unwrap();

        // The caller observes only the final success; the 401 and the
        // refresh happen underneath.
        let response = client
            .send(ApiRequest::get("/api/notifications"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The rotated pair replaced the stale one.
        assert_eq!(
            store.load().await.unwrap(),
            Some(SessionTokens {
                access_token: "fresh-access".to_owned(),
                refresh_token: "fresh-refresh".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn refresh_without_rotation_keeps_the_current_refresh_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/exercises"))
            .and(header("Authorization", "Bearer stale-access"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/client/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh-access" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/exercises"))
            .and(header("Authorization", "Bearer fresh-access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        store.save(stale_tokens()).await.unwrap();

        client.send(ApiRequest::get("/api/exercises")).await.unwrap();

        assert_eq!(
            store.load().await.unwrap(),
            Some(SessionTokens {
                access_token: "fresh-access".to_owned(),
                refresh_token: "stale-refresh".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn rejected_refresh_clears_the_session_and_yields_no_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/client/refresh-token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        store.save(stale_tokens()).await.unwrap();

        let outcome = client
            .send(ApiRequest::get("/api/notifications"))
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!client.is_logged_in().await.unwrap());

        // A follow-up call is rejected locally: the expect(1) above verifies
        // the protected route saw no second request.
        let after = client
            .send(ApiRequest::get("/api/notifications"))
            .await
            .unwrap();
        assert!(after.is_none());
    }

    #[tokio::test]
    async fn without_a_session_no_network_call_is_made() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (client, _) = client_with(&server).await;
        let outcome = client
            .send(ApiRequest::get("/api/notifications"))
            .await
            .unwrap();

        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn a_rejection_after_a_successful_refresh_is_surfaced_not_retried() {
        let server = MockServer::start().await;

        // Both attempts are rejected; the refresh itself succeeds once.
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/client/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "fresh-access",
                "refreshToken": "fresh-refresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client_with(&server).await;
        store.save(stale_tokens()).await.unwrap();

        let response = client
            .send(ApiRequest::get("/api/notifications"))
            .await
            .unwrap()
            .unwrap();

        // The second 401 comes straight back to the caller; the expect(1)
        // on the refresh mock proves there was no second exchange.
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
