#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use storefront_coupons::{
    config::AppConfig,
    db,
    entities::{CouponModel, DiscountType},
    events::{self, EventSender},
    services::coupons::{CouponService, CreateCouponInput},
    AppState,
};
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::connect_in_memory()
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = Arc::new(AppState::new(
            Arc::new(pool),
            cfg,
            EventSender::new(event_tx),
        ));
        let router =
            storefront_coupons::build_router(state.clone()).expect("router builds for tests");

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub fn coupons(&self) -> Arc<CouponService> {
        self.state.coupon_service()
    }

    /// Send a request against the router, returning status and parsed JSON body.
    ///
    /// Empty bodies come back as `Value::Null`.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// Send a raw body with the JSON content type.
    pub async fn request_raw(&self, method: Method, uri: &str, raw: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
            .status()
    }

    /// Seed a coupon through the service layer.
    pub async fn seed_coupon(&self, input: CreateCouponInput) -> CouponModel {
        self.coupons()
            .create_coupon(input)
            .await
            .expect("seed coupon for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Percentage coupon with no limits beyond the defaults.
pub fn percentage(code: &str, percent: Decimal) -> CreateCouponInput {
    CreateCouponInput::new(code, DiscountType::Percentage, percent)
}

/// Fixed-amount coupon with no limits beyond the defaults.
pub fn fixed(code: &str, amount: Decimal) -> CreateCouponInput {
    CreateCouponInput::new(code, DiscountType::Fixed, amount)
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::days(days)
}
