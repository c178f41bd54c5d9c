//! Shared helpers for the integration suite
//!
//! Every test gets its own app over a private in-memory SQLite database,
//! migrated and seeded with the two bootstrap accounts.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use registre_core::config::{
    BootstrapAccount, Config, DatabaseConfig, JwtConfig, RateLimitConfig,
};
use registre_core::jwt::JwtManager;
use registre_core::migration;
use registre_core::repository::Db;
use registre_core::server::{build_router, AppState};
use registre_core::service::{AuthService, MemberService};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@eglise.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const PASTOR_EMAIL: &str = "pasteur@eglise.com";
pub const PASTOR_PASSWORD: &str = "pasteur123";
pub const JWT_SECRET: &str = "integration-test-secret-key";

pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            token_ttl_secs: 86400,
        },
        // Generous caps so ordinary tests never trip the limiters;
        // rate-limit tests override these.
        rate_limit: RateLimitConfig {
            enabled: true,
            api_requests: 10_000,
            login_requests: 10_000,
            window_secs: 900,
        },
        bootstrap: vec![
            BootstrapAccount {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                nom: "Administrateur".to_string(),
            },
            BootstrapAccount {
                email: PASTOR_EMAIL.to_string(),
                password: PASTOR_PASSWORD.to_string(),
                nom: "Pasteur".to_string(),
            },
        ],
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: Db,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_config(test_config()).await
}

pub async fn spawn_app_with_config(config: Config) -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory SQLite should always connect");
    let db = Db::Sqlite(pool);

    migration::run_migrations(&db).await.unwrap();
    let user_repo = db.user_repository();
    migration::seed_accounts(user_repo.as_ref(), &config.bootstrap)
        .await
        .unwrap();

    let jwt_manager = JwtManager::new(config.jwt.clone());
    let auth_service = Arc::new(AuthService::new(user_repo, jwt_manager.clone()));
    let member_service = Arc::new(MemberService::new(db.member_repository()));

    let rate_limit = config.rate_limit.clone();
    let state = AppState {
        config: Arc::new(config),
        auth_service,
        member_service,
        jwt_manager,
    };
    let router = build_router(state.clone(), &rate_limit);

    TestApp { router, state, db }
}

impl TestApp {
    /// Send a request and parse the response body as JSON (Null if empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: &Value,
    ) -> (StatusCode, Value) {
        self.json_request("POST", uri, token, body).await
    }

    pub async fn put_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: &Value,
    ) -> (StatusCode, Value) {
        self.json_request("PUT", uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn json_request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/api/login",
            None,
            &json!({ "email": email, "mot_de_passe": password }),
        )
        .await
    }

    /// Log in as the bootstrap admin and return a valid session token
    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a member through the API, returning its record
    pub async fn create_member(&self, token: &str, fields: &Value) -> Value {
        let (status, body) = self.post_json("/api/membres", Some(token), fields).await;
        assert_eq!(status, StatusCode::CREATED, "member creation failed: {body}");
        body["membre"].clone()
    }
}
