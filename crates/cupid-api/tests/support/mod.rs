#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cupid_api::error::ApiError;
use cupid_api::gateway::{CreatedOrder, NewOrder, PaymentGateway};
use cupid_api::identity::{IdentityProvider, SessionData};
use cupid_api::notify::{Notification, Notifier};
use cupid_api::routes::api_router;
use cupid_api::state::{AppState, AppStateInner};
use cupid_db::Database;
use cupid_db::models::format_timestamp;

pub const PAYMENT_SECRET: &str = "test_razorpay_secret";

#[derive(Default)]
pub struct FakeIdentity {
    pub sessions: Mutex<HashMap<String, SessionData>>,
}

impl FakeIdentity {
    pub fn register(&self, session_id: &str, email: &str, name: &str, token: &str) {
        self.sessions.lock().unwrap().insert(
            session_id.to_string(),
            SessionData {
                email: email.to_string(),
                name: name.to_string(),
                picture: None,
                session_token: token.to_string(),
            },
        );
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn exchange(&self, session_id: &str) -> Result<SessionData, ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or(ApiError::InvalidSession)
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub orders: Mutex<Vec<NewOrder>>,
    pub fail_with: Mutex<Option<String>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, ApiError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(ApiError::Upstream(message));
        }
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(CreatedOrder {
            id: format!("order_{}", orders.len()),
            amount: order.amount,
            currency: order.currency.clone(),
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    /// When set, every send is recorded and then reported as failed.
    pub failing: AtomicBool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("smtp relay refused connection");
        }
        Ok(())
    }
}

impl RecordingNotifier {
    /// Dispatch is spawned, so give the task a chance to run.
    pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
        for _ in 0..100 {
            {
                let sent = self.sent.lock().unwrap();
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub identity: Arc<FakeIdentity>,
    pub gateway: Arc<FakeGateway>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        let identity = Arc::new(FakeIdentity::default());
        let gateway = Arc::new(FakeGateway::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let state: AppState = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            identity: identity.clone(),
            gateway: gateway.clone(),
            notifier: notifier.clone(),
            payment_secret: PAYMENT_SECRET.to_string(),
        });

        Self {
            router: api_router(state.clone()),
            state,
            identity,
            gateway,
            notifier,
        }
    }

    /// Seed a user plus a live session directly in the store.
    pub fn seed_session(&self, user_id: &str, email: &str, token: &str) {
        let now = Utc::now();
        self.state
            .db
            .upsert_user(user_id, email, "Seeded", None, &format_timestamp(now))
            .unwrap();
        self.state
            .db
            .create_session(
                token,
                user_id,
                &format_timestamp(now + chrono::Duration::days(7)),
                &format_timestamp(now),
            )
            .unwrap();
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, format!("session_token={}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_with_cookie(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("session_token={}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}
