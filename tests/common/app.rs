//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use recolor::models::AppConfig;
use recolor::server::{build_router, create_app_state};
use recolor::services::SessionStore;

/// Test application with router and direct access to the session store
pub struct TestApp {
    router: axum::Router,
    pub sessions: Arc<dyn SessionStore>,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(Self::test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = create_app_state(config);
        let sessions = state.sessions.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self { router, sessions }
    }

    /// Defaults, minus PNG recompression to keep tests fast
    pub fn test_config() -> AppConfig {
        AppConfig {
            optimize_png: false,
            ..AppConfig::default()
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let builder = Request::post(path).header("Content-Type", "application/json");
        self.request(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Make a POST request with no body
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a raw binary body
    pub async fn post_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let builder = Request::post(path).header("Content-Type", "application/octet-stream");
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload an image and return the new session id
    pub async fn create_session(&self, image: Vec<u8>) -> String {
        let response = self.post_bytes("/api/sessions?name=test.png", image).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "upload failed: {}",
            response.text()
        );

        let json: serde_json::Value = response.json();
        json["id"].as_str().unwrap().to_string()
    }

    /// Download the working image as PNG and decode it to RGBA bytes
    pub async fn working_rgba(&self, id: &str) -> Vec<u8> {
        let response = self.get(&format!("/api/sessions/{id}/image")).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        image::load_from_memory(&response.body)
            .expect("Failed to decode image")
            .to_rgba8()
            .into_raw()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
