//! End-to-end tests: a real listener, real stores, and the session client
//! from `gymkit_session` driving the full login / refresh / retry protocol.

use secrecy::Secret;
use serde_json::{Value, json};

use gymkit_adapters::{
    Argon2CredentialHasher, DashMapRefreshTokenStore, HashMapClientStore, HashMapExerciseStore,
    HashMapNotificationStore, HashMapTrainerStore, JwtConfig, JwtTokenService,
};
use gymkit_core::{PrincipalId, Role, TokenIssuer};
use gymkit_service::GymService;
use gymkit_session::{ApiRequest, MemorySessionStore, SessionClient, SessionStore, SessionTokens};

const TEST_JWT_SECRET: &str = "test-jwt-secret";

struct TestApp {
    address: String,
}

impl TestApp {
    /// A token service sharing the app's secret but issuing already-expired
    /// access tokens, for exercising the refresh path.
    fn expired_token_service(&self) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            jwt_secret: Secret::from(TEST_JWT_SECRET.to_owned()),
            access_token_ttl_seconds: -300,
            refresh_token_ttl_seconds: 600,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

async fn spawn_app() -> TestApp {
    let token_service =
        JwtTokenService::new(JwtConfig::new(Secret::from(TEST_JWT_SECRET.to_owned())));

    let service = GymService::new(
        HashMapTrainerStore::new(),
        HashMapClientStore::new(),
        DashMapRefreshTokenStore::new(),
        HashMapExerciseStore::new(),
        HashMapNotificationStore::new(),
        Argon2CredentialHasher,
        token_service,
        "assets".to_string(),
    );

    let router = service.as_nested_router(None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

/// Register a trainer and create a client record with credentials, the way
/// the real flow seeds client accounts.
async fn seed_client(app: &TestApp, client_name: &str, client_password: &str) -> String {
    let trainer_session =
        SessionClient::new(app.address.clone(), MemorySessionStore::new()).unwrap();
    let trainer = trainer_session
        .register_trainer("Jordan", "jordan@example.com", "trainer-pass")
        .await
        .unwrap();
    let trainer_id = trainer["id"].as_str().unwrap().to_owned();

    let created = trainer_session
        .send(ApiRequest::post(
            "/api/clients",
            json!({
                "clientData": { "name": client_name, "password": client_password },
                "trainerId": trainer_id.clone(),
            }),
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.status(), 201);

    trainer_id
}

#[tokio::test]
async fn client_login_returns_tokens_and_a_protected_call_succeeds() {
    let app = spawn_app().await;
    seed_client(&app, "alex", "correct").await;

    let store = MemorySessionStore::new();
    let session = SessionClient::new(app.address.clone(), store.clone()).unwrap();

    let user = session.login_client("alex", "correct").await.unwrap();
    assert_eq!(user["role"], "client");
    assert_eq!(user["name"], "alex");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let held = store.load().await.unwrap().unwrap();
    assert!(!held.access_token.is_empty());
    assert!(!held.refresh_token.is_empty());

    let response = session
        .send(ApiRequest::get("/api/exercises"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn unknown_name_and_wrong_password_are_indistinguishable_on_the_wire() {
    let app = spawn_app().await;
    seed_client(&app, "alex", "correct").await;

    let http = reqwest::Client::new();

    let unknown = http
        .post(app.url("/api/auth/client/login"))
        .json(&json!({ "name": "ghost", "password": "correct" }))
        .send()
        .await
        .unwrap();
    let unknown_status = unknown.status();
    let unknown_body: Value = unknown.json().await.unwrap();

    let wrong = http
        .post(app.url("/api/auth/client/login"))
        .json(&json!({ "name": "alex", "password": "incorrect" }))
        .send()
        .await
        .unwrap();
    let wrong_status = wrong.status();
    let wrong_body: Value = wrong.json().await.unwrap();

    assert_eq!(unknown_status, 401);
    assert_eq!(wrong_status, 401);
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn expired_access_token_is_renewed_transparently() {
    let app = spawn_app().await;
    seed_client(&app, "alex", "correct").await;

    let store = MemorySessionStore::new();
    let session = SessionClient::new(app.address.clone(), store.clone()).unwrap();
    let user = session.login_client("alex", "correct").await.unwrap();

    // Swap the held access token for one that is already past its expiry
    // (signed with the same secret, same principal).
    let held = store.load().await.unwrap().unwrap();
    let expired_access = app
        .expired_token_service()
        .issue_access_token(
            &PrincipalId::from(user["id"].as_str().unwrap().to_owned()),
            Role::Client,
        )
        .unwrap();
    store
        .save(SessionTokens {
            access_token: expired_access,
            refresh_token: held.refresh_token.clone(),
        })
        .await
        .unwrap();

    // The caller sees only the final success.
    let response = session
        .send(ApiRequest::get("/api/exercises"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status(), 200);

    // The session now holds a renewed pair; the refresh token was rotated.
    let renewed = store.load().await.unwrap().unwrap();
    assert_ne!(renewed.refresh_token, held.refresh_token);
}

#[tokio::test]
async fn a_rotated_refresh_token_cannot_be_replayed() {
    let app = spawn_app().await;
    seed_client(&app, "alex", "correct").await;

    let store = MemorySessionStore::new();
    let session = SessionClient::new(app.address.clone(), store.clone()).unwrap();
    let user = session.login_client("alex", "correct").await.unwrap();
    let client_id = PrincipalId::from(user["id"].as_str().unwrap().to_owned());

    // First renewal consumes the original refresh token.
    let original = store.load().await.unwrap().unwrap();
    let expired = app.expired_token_service();
    store
        .save(SessionTokens {
            access_token: expired
                .issue_access_token(&client_id, Role::Client)
                .unwrap(),
            refresh_token: original.refresh_token.clone(),
        })
        .await
        .unwrap();
    session
        .send(ApiRequest::get("/api/exercises"))
        .await
        .unwrap()
        .unwrap();

    // Replaying the consumed refresh token tears the session down: no data,
    // both tokens cleared.
    store
        .save(SessionTokens {
            access_token: expired
                .issue_access_token(&client_id, Role::Client)
                .unwrap(),
            refresh_token: original.refresh_token,
        })
        .await
        .unwrap();

    let outcome = session.send(ApiRequest::get("/api/exercises")).await.unwrap();
    assert!(outcome.is_none());
    assert!(store.load().await.unwrap().is_none());
    assert!(!session.is_logged_in().await.unwrap());

    // A further protected call is rejected locally, before any request.
    let after = session.send(ApiRequest::get("/api/exercises")).await.unwrap();
    assert!(after.is_none());
}

#[tokio::test]
async fn registration_with_an_empty_password_writes_nothing() {
    let app = spawn_app().await;
    let http = reqwest::Client::new();

    let response = http
        .post(app.url("/api/auth/trainer/register"))
        .json(&json!({ "name": "Sam", "email": "sam@example.com", "password": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Password is required");

    // Nothing was stored: the email is still free to register.
    let retry = http
        .post(app.url("/api/auth/trainer/register"))
        .json(&json!({ "name": "Sam", "email": "sam@example.com", "password": "real-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(retry.status(), 201);
}

#[tokio::test]
async fn duplicate_registration_is_rejected_with_400() {
    let app = spawn_app().await;
    let http = reqwest::Client::new();

    let body = json!({ "name": "Sam", "email": "sam@example.com", "password": "pw-one" });
    let first = http
        .post(app.url("/api/auth/trainer/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second = http
        .post(app.url("/api/auth/trainer/register"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 400);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_malformed_tokens() {
    let app = spawn_app().await;
    let http = reqwest::Client::new();

    let missing = http
        .get(app.url("/api/notifications"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);

    let malformed = http
        .get(app.url("/api/notifications"))
        .bearer_auth("definitely-not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), 401);
}

#[tokio::test]
async fn workout_logging_merges_into_the_daily_entry() {
    let app = spawn_app().await;

    let trainer_session =
        SessionClient::new(app.address.clone(), MemorySessionStore::new()).unwrap();
    let trainer = trainer_session
        .register_trainer("Jordan", "jordan@example.com", "trainer-pass")
        .await
        .unwrap();

    let created = trainer_session
        .send(ApiRequest::post(
            "/api/clients",
            json!({
                "clientData": { "name": "alex" },
                "trainerId": trainer["id"],
            }),
        ))
        .await
        .unwrap()
        .unwrap();
    let client: Value = created.json().await.unwrap();
    let client_id = client["id"].as_str().unwrap();

    // 90 seconds rounds to 2 minutes; a second log on the same day merges.
    let first = trainer_session
        .send(ApiRequest::post(
            format!("/api/clients/{client_id}/log-workout"),
            json!({ "durationSeconds": 90 }),
        ))
        .await
        .unwrap()
        .unwrap();
    let first: Value = first.json().await.unwrap();
    assert_eq!(first["workoutLogs"][0]["duration"], 2);

    let second = trainer_session
        .send(ApiRequest::post(
            format!("/api/clients/{client_id}/log-workout"),
            json!({ "durationSeconds": 600 }),
        ))
        .await
        .unwrap()
        .unwrap();
    let second: Value = second.json().await.unwrap();
    assert_eq!(second["workoutLogs"][0]["duration"], 12);
    assert_eq!(second["workoutLogs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn updating_an_unknown_client_is_a_404() {
    let app = spawn_app().await;

    let trainer_session =
        SessionClient::new(app.address.clone(), MemorySessionStore::new()).unwrap();
    trainer_session
        .register_trainer("Jordan", "jordan@example.com", "trainer-pass")
        .await
        .unwrap();

    let response = trainer_session
        .send(ApiRequest::put(
            "/api/clients/client-does-not-exist",
            json!({ "name": "renamed" }),
        ))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response.status(), 404);
}
