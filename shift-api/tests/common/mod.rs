//! Common test utilities for integration tests
//!
//! Every context runs against its own in-memory store, so tests need no
//! database and can run in parallel:
//! - Router construction with a fixed test configuration
//! - Company seeding under fixed ids
//! - JWT token generation
//! - A small request helper that decodes JSON bodies

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use shift_api::app::{build_router, AppState};
use shift_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, SuggestionsConfig};
use shift_assistant::ShiftSuggester;
use shift_shared::auth::jwt::{create_token, Claims, TokenType};
use shift_shared::models::company::{Company, CompanyPlan};
use shift_shared::store::{to_fields, CollectionPath, DocumentStore, MemoryStore};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
            log_json: false,
        },
        database: DatabaseConfig::default(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        suggestions: SuggestionsConfig::default(),
    }
}

impl TestContext {
    /// Context without an AI generator
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_suggester(suggester: ShiftSuggester) -> Self {
        Self::build(Some(suggester))
    }

    fn build(suggester: Option<ShiftSuggester>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = test_config();

        let mut state = AppState::new(store.clone(), config.clone());
        if let Some(suggester) = suggester {
            state = state.with_suggester(suggester);
        }

        Self {
            store,
            app: build_router(state),
            config,
        }
    }

    /// Writes a company under a fixed id, owned by `owner_uid`
    pub async fn seed_company(&self, id: &str, owner_uid: &str, plan: CompanyPlan) {
        let company = Company {
            name: format!("Company {}", id),
            owner_uid: owner_uid.to_string(),
            plan,
            org_number: None,
            industry: None,
            employee_count: None,
            phone: None,
            created_at: None,
        };

        self.store
            .set(&CollectionPath::companies(), id, to_fields(&company).unwrap())
            .await
            .unwrap();
    }

    /// Access token for `user_id`; the user document itself is not created
    pub fn token_for(&self, user_id: &str) -> String {
        let claims = Claims::new(user_id, format!("User {}", user_id), TokenType::Access);
        create_token(&claims, &self.config.jwt.secret).unwrap()
    }

    /// Sends one request through the router and decodes the body as JSON
    ///
    /// Empty bodies decode to `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }
}

pub fn suggestion_input() -> Value {
    serde_json::json!({
        "employeeAvailability": "[{\"name\":\"Ada\",\"days\":[\"Mon\",\"Tue\"]}]",
        "demandForecast": "{\"Mon\":\"high\",\"Tue\":\"low\"}",
        "laborCosts": "{\"Ada\":25}"
    })
}
