#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use coursedesk::api::router;
use coursedesk::auth::{Claims, JwtIdentityProvider, issue_token};
use coursedesk::config::{AppConfig, ScreenshotBackend};
use coursedesk::db;
use coursedesk::error::AppError;
use coursedesk::events::CatalogEvents;
use coursedesk::state::AppState;
use coursedesk::storage::ScreenshotStore;
use coursedesk::validation::ProofImage;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Counts uploads instead of storing anything.
#[derive(Default)]
pub struct RecordingStore {
    pub calls: AtomicUsize,
}

impl RecordingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScreenshotStore for RecordingStore {
    async fn store(&self, owner_id: &str, image: ProofImage) -> Result<String, AppError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://img.example.com/{}-{}.{}",
            owner_id, n, image.extension
        ))
    }
}

pub struct TestApp {
    pub app: Router,
    pub db: SqlitePool,
    pub store: Arc<RecordingStore>,
    pub events: CatalogEvents,
}

pub async fn setup() -> TestApp {
    // one connection, or every checkout would see a fresh in-memory database
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create database");

    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        jwt_secret: SECRET.to_string(),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        upload_dir: std::env::temp_dir().join("coursedesk-test-uploads"),
        public_base_url: "http://localhost".to_string(),
        screenshot_backend: ScreenshotBackend::Disk,
        upi_id: "academy@upi".to_string(),
        bundle_whatsapp_link: Some("https://chat.whatsapp.com/bundle".to_string()),
    };

    let store = Arc::new(RecordingStore::default());
    let events = CatalogEvents::default();
    let state = AppState {
        db: pool.clone(),
        config: Arc::new(config),
        identity: Arc::new(JwtIdentityProvider::new(SECRET)),
        screenshots: store.clone(),
        catalog_events: events.clone(),
    };

    TestApp {
        app: router(state),
        db: pool,
        store,
        events,
    }
}

fn exp() -> usize {
    (chrono::Utc::now().timestamp() + 3600) as usize
}

pub fn student_token(uid: &str) -> String {
    phone_token(uid, "+919876543210")
}

pub fn phone_token(uid: &str, phone: &str) -> String {
    issue_token(
        SECRET,
        &Claims {
            sub: uid.to_string(),
            phone_number: Some(phone.to_string()),
            email: None,
            email_verified: false,
            exp: exp(),
        },
    )
    .unwrap()
}

pub fn admin_token() -> String {
    email_token("admin-uid", ADMIN_EMAIL, true)
}

pub fn email_token(uid: &str, email: &str, verified: bool) -> String {
    issue_token(
        SECRET,
        &Claims {
            sub: uid.to_string(),
            phone_number: None,
            email: Some(email.to_string()),
            email_verified: verified,
            exp: exp(),
        },
    )
    .unwrap()
}

pub fn screenshot() -> Value {
    serde_json::json!({
        "data": STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]),
        "content_type": "image/jpeg",
        "file_name": "payment.jpg"
    })
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn ucm_course() -> Value {
    serde_json::json!({
        "course_code": "UCM",
        "name": "Underground Coal Mining",
        "description": "Methods of working coal seams below ground.",
        "instructor": "PMA",
        "base_price": 1999,
        "early_bird_price": 1499,
        "early_bird_slots": 10,
        "total_slots": 50,
        "whatsapp_link": "https://chat.whatsapp.com/ucm",
        "highlights": ["Bord and pillar", "Longwall", "  "]
    })
}

pub async fn create_ucm(app: &Router) -> Value {
    let (status, body) = send(app, "POST", "/admin/courses", Some(&admin_token()), Some(ucm_course())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

pub fn registration_body(course_id: &str, option: &str) -> Value {
    serde_json::json!({
        "course_id": course_id,
        "name": "Asha Kumari",
        "email": "asha@example.com",
        "phone": "9876543210",
        "college": "IIT (ISM) Dhanbad",
        "payment_option": option,
        "screenshot": screenshot()
    })
}
