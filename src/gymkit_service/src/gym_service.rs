use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{get, post, put},
};
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use gymkit_adapters::config::AllowedOrigins;
use gymkit_axum::routes;
use gymkit_core::{
    ClientStore, CredentialHasher, ExerciseLibraryStore, NotificationStore, RefreshTokenStore,
    TokenIssuer, TokenVerifier, TrainerStore,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The assembled gym-management backend: auth routes, the protected CRUD
/// surface, and static assets with an SPA fallback.
pub struct GymService {
    router: Router,
}

impl GymService {
    /// Wire the service from its stores and services.
    ///
    /// # Note on Architecture
    /// Stores implement Clone via internal shared state (Arc or a pool), so
    /// each route is given exactly the state it needs and nothing more.
    #[allow(clippy::too_many_arguments)]
    pub fn new<TS, CS, RS, ES, NS, H, TK>(
        trainer_store: TS,
        client_store: CS,
        refresh_token_store: RS,
        exercise_store: ES,
        notification_store: NS,
        hasher: H,
        token_service: TK,
        assets_dir: String,
    ) -> Self
    where
        TS: TrainerStore + Clone + 'static,
        CS: ClientStore + Clone + 'static,
        RS: RefreshTokenStore + Clone + 'static,
        ES: ExerciseLibraryStore + Clone + 'static,
        NS: NotificationStore + Clone + 'static,
        H: CredentialHasher + Clone + 'static,
        TK: TokenIssuer + TokenVerifier + Clone + 'static,
    {
        let assets_service =
            ServeDir::new(assets_dir.clone()).fallback(ServeFile::new(assets_dir + "/index.html"));

        let router = Router::new()
            // Credential verification and token issuance
            .route(
                "/api/auth/client/login",
                post(routes::client_login::<CS, H, TK, RS>),
            )
            .with_state((
                client_store.clone(),
                hasher.clone(),
                token_service.clone(),
                refresh_token_store.clone(),
            ))
            .route(
                "/api/auth/trainer/login",
                post(routes::trainer_login::<TS, H, TK, RS>),
            )
            .with_state((
                trainer_store.clone(),
                hasher.clone(),
                token_service.clone(),
                refresh_token_store.clone(),
            ))
            .route(
                "/api/auth/trainer/register",
                post(routes::register_trainer::<TS, H, TK, RS>),
            )
            .with_state((
                trainer_store,
                hasher.clone(),
                token_service.clone(),
                refresh_token_store.clone(),
            ))
            .route(
                "/api/auth/client/refresh-token",
                post(routes::refresh_token::<RS, TK>),
            )
            .with_state((refresh_token_store, token_service.clone()))
            // Protected CRUD surface
            .route(
                "/api/clients",
                get(routes::list_clients::<TK, CS, H>).post(routes::create_client::<TK, CS, H>),
            )
            .with_state((
                token_service.clone(),
                client_store.clone(),
                hasher.clone(),
            ))
            .route(
                "/api/clients/{id}",
                put(routes::update_client::<TK, CS, H>)
                    .delete(routes::delete_client::<TK, CS, H>),
            )
            .with_state((token_service.clone(), client_store.clone(), hasher))
            .route(
                "/api/clients/{id}/log-workout",
                post(routes::log_workout::<TK, CS>),
            )
            .with_state((token_service.clone(), client_store))
            .route(
                "/api/exercises",
                get(routes::get_exercises::<TK, ES>).put(routes::replace_exercises::<TK, ES>),
            )
            .with_state((token_service.clone(), exercise_store))
            .route(
                "/api/notifications",
                get(routes::list_notifications::<TK, NS>)
                    .post(routes::create_notification::<TK, NS>),
            )
            .with_state((token_service.clone(), notification_store.clone()))
            .route(
                "/api/notifications/clear",
                post(routes::clear_notifications::<TK, NS>),
            )
            .with_state((token_service, notification_store))
            .fallback_service(assets_service);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert into a router that can be mounted on another application.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run as a standalone server on the given listener.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Gym service listening on {}", listener.local_addr()?);

        axum_server::from_tcp(listener.into_std()?)?
            .serve(router.into_make_service())
            .await
    }
}

/// Open the shared Postgres pool; established once at startup and cloned
/// into the stores.
pub async fn configure_postgres(url: &Secret<String>) -> Result<sqlx::PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}

pub fn get_redis_client(host_name: &str) -> redis::RedisResult<redis::Client> {
    redis::Client::open(format!("redis://{}/", host_name))
}
