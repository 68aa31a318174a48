#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use admin_api_rust::config::config;
use admin_api_rust::database::MemoryStore;
use admin_api_rust::middleware::Claims;

pub const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/admin.json");

pub async fn seeded_store() -> Result<MemoryStore> {
    MemoryStore::from_fixture_file(FIXTURE)
        .await
        .context("failed to load fixture")
}

pub async fn test_app() -> Result<Router> {
    Ok(admin_api_rust::app(seeded_store().await?))
}

/// HS256 token for `user_id`, signed with the configured secret
pub fn token_for(user_id: i64) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id,
        username: format!("user{}", user_id),
        exp: now + 3600,
        iat: now,
    };
    let key = EncodingKey::from_secret(config().security.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn assert_success(&self) {
        assert_eq!(self.status, StatusCode::OK, "unexpected status: {} body: {}", self.status, self.body);
        assert!(self.body["success"].as_bool().unwrap_or(false), "success=false: {}", self.body);
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok(TestResponse { status, body })
}

/// GET as user `user_id`
pub async fn get_as(app: &Router, user_id: i64, uri: &str) -> Result<TestResponse> {
    let token = token_for(user_id)?;
    send(app, Method::GET, uri, Some(&token), None).await
}

/// POST a JSON body as user `user_id`
pub async fn post_as(app: &Router, user_id: i64, uri: &str, body: Value) -> Result<TestResponse> {
    let token = token_for(user_id)?;
    send(app, Method::POST, uri, Some(&token), Some(body)).await
}

pub fn ids(nodes: &Value) -> Vec<i64> {
    nodes
        .as_array()
        .map(|items| items.iter().filter_map(|n| n["id"].as_i64()).collect())
        .unwrap_or_default()
}
