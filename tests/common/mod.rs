#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use beauty_erp::{
    config::AppConfig,
    db::{self, DbConfig},
    gateway::{resolve_upstream, Upstream},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

/// All three services over one fresh in-memory SQLite database.
pub struct TestApp {
    pub state: Arc<AppState>,
    user: Router,
    inventory: Router,
    order: Router,
}

pub async fn memory_db() -> DatabaseConnection {
    let pool = db::establish_connection_with_config(&DbConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("in-memory sqlite");
    db::run_migrations(&pool).await.expect("migrations");
    pool
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Arc::new(memory_db().await);
        let config = AppConfig::new("sqlite::memory:", "test");
        let state = Arc::new(AppState::new(db, config, "test-service"));

        Self {
            user: beauty_erp::user_router(state.clone()),
            inventory: beauty_erp::inventory_router(state.clone()),
            order: beauty_erp::order_router(state.clone()),
            state,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Router that would receive `uri` behind the gateway.
    fn router_for(&self, uri: &str) -> Router {
        let path = uri.split('?').next().unwrap_or(uri);
        match resolve_upstream(path) {
            Some(Upstream::Inventory) => self.inventory.clone(),
            Some(Upstream::Order) => self.order.clone(),
            _ => self.user.clone(),
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize body"))
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request");

        let response = self
            .router_for(uri)
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// POSTs and asserts `201`, returning the created body.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, value) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri}: {value}");
        value
    }

    pub async fn seed_user_type(&self, user_type_id: i32) -> Value {
        self.create(
            "/user-types",
            json!({ "user_type_id": user_type_id, "type_name": format!("type-{user_type_id}") }),
        )
        .await
    }

    pub async fn seed_user(&self, user_code: &str, user_type_id: i32) -> Value {
        self.create(
            "/users",
            json!({
                "user_code": user_code,
                "user_type_id": user_type_id,
                "username": format!("{}-login", user_code.to_lowercase()),
                "password": "correct horse battery",
                "name": format!("User {user_code}"),
                "email": format!("{}@example.com", user_code.to_lowercase()),
            }),
        )
        .await
    }

    pub async fn seed_customer(&self, user_code: &str) -> Value {
        self.create(
            "/customers",
            json!({
                "user_code": user_code,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "city": "Colombo",
            }),
        )
        .await
    }

    pub async fn seed_product(&self, name: &str) -> Value {
        self.create(
            "/products",
            json!({ "category": "Lipstick", "name": name }),
        )
        .await
    }

    pub async fn seed_variant(&self, product_id: i64, code: &str, price: f64, quantity: i32) -> Value {
        self.create(
            "/variants",
            json!({
                "product_id": product_id,
                "product_code": code,
                "color": "Ruby",
                "price": price,
                "quantity": quantity,
                "min_qty": 5,
            }),
        )
        .await
    }
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("id field")
}

/// Decimals serialize as strings; numbers are accepted too.
pub fn decimal(value: &Value) -> Decimal {
    serde_json::from_value(value.clone()).expect("decimal value")
}

pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
