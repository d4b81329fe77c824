//! Common test utilities for integration tests.
//!
//! Every test gets its own in-memory SQLite database with the schema applied,
//! so tests can run in parallel without cleanup.

// Not every integration test binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use domain::models::ProfileType;
use donation_platform_api::app::{build_cache, cache_strategy, create_app, AppState};
use donation_platform_api::config::{
    CacheConfig, Config, DatabaseConfig, EmailConfig, JobsConfig, LoggingConfig, ServerConfig,
    SmsConfig,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use persistence::entities::{ProfileEntity, UserEntity};
use sqlx::SqlitePool;

/// Test configuration: in-memory database, caching on, jobs off.
pub fn test_config(settings: &[(&str, &str)]) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_origins: vec![],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        cache: CacheConfig {
            enabled: true,
            default_ttl_secs: 300,
        },
        jobs: JobsConfig::default(),
        email: EmailConfig::default(),
        sms: SmsConfig::default(),
        settings: settings
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub pool: SqlitePool,
}

/// Build the router over a fresh database.
pub async fn setup_with(config: Config) -> TestApp {
    let pool = persistence::db::create_pool(&(&config.database).into())
        .await
        .expect("Failed to create test pool");
    persistence::schema::apply(&pool)
        .await
        .expect("Failed to apply schema");

    let cache = cache_strategy(build_cache(&config.cache));
    let state = AppState::new(Arc::new(config), pool.clone(), cache);
    TestApp {
        router: create_app(state.clone()),
        state,
        pool,
    }
}

pub async fn setup() -> TestApp {
    setup_with(test_config(&[])).await
}

/// Insert a user with one profile of the given type.
pub async fn create_profile(app: &TestApp, profile_type: ProfileType) -> ProfileEntity {
    let email: String = SafeEmail().fake();
    let first: String = FirstName().fake();
    let last: String = LastName().fake();

    let user = app
        .state
        .repository::<UserEntity>()
        .add(UserEntity::new(email, first.clone()), "test")
        .await
        .expect("Failed to create user");

    app.state
        .profiles
        .add(ProfileEntity::new(user.audit.id, profile_type, first, last), "test")
        .await
        .expect("Failed to create profile")
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request_as(
    method: Method,
    uri: &str,
    actor: &str,
    body: serde_json::Value,
) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request
        .headers_mut()
        .insert("x-actor", actor.parse().unwrap());
    request
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&body).unwrap()
}
