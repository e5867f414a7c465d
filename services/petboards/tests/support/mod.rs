//! Shared helpers for driving the router in-process
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use petboards::{
    AppState, create_router,
    security::{SigningSecret, TokenService},
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse";

/// Parse an RFC 3339 timestamp field of a response body
pub fn timestamp(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

/// Let the clock advance so successive timestamps differ
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
}

pub fn test_tokens() -> TokenService {
    let secret = SigningSecret::new("integration-test-secret").unwrap();
    TokenService::new(&secret, Duration::hours(1))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn new() -> Self {
        let tokens = test_tokens();
        Self::with_state(AppState::in_memory(tokens.clone()), tokens)
    }

    pub fn with_state(state: AppState, tokens: TokenService) -> Self {
        Self {
            router: create_router(state),
            tokens,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": username,
                "password": PASSWORD,
                "first_name": "Test",
                "last_name": "User",
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register `username` and return a token for it
    pub async fn sign_up(&self, username: &str) -> String {
        assert_eq!(self.register(username).await.status, StatusCode::CREATED);
        let response = self.login(username, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Create a board and return its location
    pub async fn create_board(&self, token: &str, topic: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/boards",
                Some(token),
                Some(json!({ "topic": topic })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.location().to_string()
    }
}
