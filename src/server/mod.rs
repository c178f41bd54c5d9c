//! Server initialization and routing

use crate::api;
use crate::config::{Config, RateLimitConfig};
use crate::jwt::JwtManager;
use crate::middleware::{
    inject_client_ip, rate_limit_middleware, require_auth, AuthState, RateLimitState,
};
use crate::migration;
use crate::repository::Db;
use crate::service::{AuthService, MemberService};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

const API_RATE_MESSAGE: &str = "Trop de requêtes, veuillez réessayer plus tard.";
const LOGIN_RATE_MESSAGE: &str = "Trop de tentatives de connexion, veuillez réessayer plus tard.";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: Arc<AuthService>,
    pub member_service: Arc<MemberService>,
    pub jwt_manager: JwtManager,
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    // Connect to the datastore named by DATABASE_URL
    let db = Db::connect(&config.database).await?;
    info!("Connected to database");

    // Ensure schema exists, then seed the bootstrap accounts
    migration::run_migrations(&db).await?;
    let user_repo = db.user_repository();
    migration::seed_accounts(user_repo.as_ref(), &config.bootstrap).await?;

    let jwt_manager = JwtManager::new(config.jwt.clone());
    let auth_service = Arc::new(AuthService::new(user_repo, jwt_manager.clone()));
    let member_service = Arc::new(MemberService::new(db.member_repository()));

    let rate_limit = config.rate_limit.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        auth_service,
        member_service,
        jwt_manager,
    };

    let app = build_router(state, &rate_limit);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Build the HTTP router
///
/// Login sits outside the auth middleware but inside both limiters; every
/// other `/api` route requires a verified token and shares the general
/// limiter. Health and the root redirect bypass all of it.
pub fn build_router(state: AppState, rate_limit: &RateLimitConfig) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_state = AuthState::new(state.jwt_manager.clone());
    let api_limiter = RateLimitState::new(
        rate_limit.api_requests,
        rate_limit.window_secs,
        API_RATE_MESSAGE,
        rate_limit.enabled,
    );
    let login_limiter = RateLimitState::new(
        rate_limit.login_requests,
        rate_limit.window_secs,
        LOGIN_RATE_MESSAGE,
        rate_limit.enabled,
    );

    let login_routes = Router::new()
        .route("/api/login", post(api::auth::login))
        .layer(axum::middleware::from_fn_with_state(
            login_limiter,
            rate_limit_middleware,
        ));

    let protected_routes = Router::new()
        .route(
            "/api/membres",
            post(api::member::create).get(api::member::list),
        )
        .route("/api/membres/rechercher/query", get(api::member::search))
        .route(
            "/api/membres/{id}",
            get(api::member::get)
                .put(api::member::update)
                .delete(api::member::delete),
        )
        .route("/api/statistiques", get(api::stats::statistiques))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_auth,
        ));

    let api_routes = Router::new()
        .merge(login_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn_with_state(
            api_limiter,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(api::health::health))
        .route("/", get(api::health::root_redirect))
        .merge(api_routes)
        // Give the limiters an address to key on, even without a proxy
        .layer(axum::middleware::from_fn(inject_client_ip))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
