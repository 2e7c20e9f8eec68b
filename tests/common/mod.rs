//! Shared helpers for router tests: settings, signed tokens, request builders, and a
//! fresh migrated database per test when `DATABASE_URL` is set.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use wine_shop::{app, apply_migrations, ensure_database_exists, AppState, Settings};

pub const SECRET: &str = "integration-secret-integration-secret";

pub fn settings(database_url: &str, public_base_url: Option<&str>) -> Settings {
    Settings::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "DATABASE_URL" => Some(database_url.to_string()),
        "PUBLIC_BASE_URL" => public_base_url.map(str::to_string),
        _ => None,
    })
    .unwrap()
}

/// Router over a pool that never connects; only usable for requests answered before
/// the first query.
pub fn lazy_router(public_base_url: Option<&str>) -> Router {
    let settings = settings("postgres://localhost/wine_shop_test", public_base_url);
    let pool = PgPoolOptions::new().connect_lazy(&settings.database_url).unwrap();
    app(AppState::new(pool, settings))
}

pub fn router(pool: &PgPool) -> Router {
    app(AppState::new(pool.clone(), settings("postgres://unused/wine_shop", None)))
}

/// `base` with its database name swapped for `name`, query string kept.
fn with_database(base: &str, name: &str) -> String {
    let (without_query, query) = match base.split_once('?') {
        Some((u, q)) => (u, Some(q)),
        None => (base, None),
    };
    let scheme_end = without_query.find("://").map(|i| i + 3).unwrap_or(0);
    let prefix = match without_query[scheme_end..].find('/') {
        Some(i) => &without_query[..scheme_end + i],
        None => without_query,
    };
    match query {
        Some(q) => format!("{}/{}?{}", prefix, name, q),
        None => format!("{}/{}", prefix, name),
    }
}

/// A freshly created and migrated database, or `None` (test skipped) without
/// `DATABASE_URL`.
pub async fn fresh_pool() -> Option<PgPool> {
    let Ok(base) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    let name = format!("wine_shop_test_{}", uuid::Uuid::new_v4().simple());
    let url = with_database(&base, &name);
    ensure_database_exists(&url).await.unwrap();
    let pool = PgPoolOptions::new().max_connections(8).connect(&url).await.unwrap();
    apply_migrations(&pool).await.unwrap();
    Some(pool)
}

pub fn token(sub: &str, exp_offset_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "shop.test")
        .body(Body::empty())
        .unwrap()
}

pub fn authed(method: Method, uri: &str, bearer: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "shop.test")
        .header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}

#[test]
fn database_name_is_swapped() {
    assert_eq!(
        with_database("postgres://u:p@localhost:5432/wine_shop?sslmode=disable", "t1"),
        "postgres://u:p@localhost:5432/t1?sslmode=disable"
    );
    assert_eq!(with_database("postgres://localhost", "t2"), "postgres://localhost/t2");
}
