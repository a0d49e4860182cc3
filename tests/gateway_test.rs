mod common;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use beauty_erp::{
    config::AppConfig,
    gateway::{
        rate_limit::{LIMIT_HEADER, REMAINING_HEADER},
        GatewayState, RateLimitConfig, RateLimiter,
    },
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_json, header, header_exists, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn gateway(user: &str, inventory: &str, order: &str, limit: RateLimitConfig) -> Router {
    let state = GatewayState::new(user, inventory, order, Duration::from_secs(2))
        .expect("http client");
    let config = AppConfig::new("sqlite::memory:", "test");
    beauty_erp::gateway_router(Arc::new(state), RateLimiter::new(limit), &config)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn gateway_answers_health_itself() {
    let router = gateway(UNREACHABLE, UNREACHABLE, UNREACHABLE, RateLimitConfig::default());
    let (status, _, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "api-gateway");
}

#[tokio::test]
async fn unclaimed_paths_are_json_404s() {
    let router = gateway(UNREACHABLE, UNREACHABLE, UNREACHABLE, RateLimitConfig::default());
    let (status, _, body) = send(&router, get("/warehouses/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Route /warehouses/1 not found");
}

#[tokio::test]
async fn requests_are_forwarded_by_prefix() {
    let users = MockServer::start().await;
    let inventory = MockServer::start().await;
    let orders = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/variants/low-stock"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "product_code": "VM-PLUM" }])))
        .expect(1)
        .mount(&inventory)
        .await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "customer_code": "U001" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&orders)
        .await;

    Mock::given(method("GET"))
        .and(path("/customers/3/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&orders)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&users)
        .await;

    let router = gateway(&users.uri(), &inventory.uri(), &orders.uri(), RateLimitConfig::default());

    let (status, _, body) = send(&router, get("/variants/low-stock")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["product_code"], "VM-PLUM");

    let create = Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "customer_code": "U001" }).to_string()))
        .unwrap();
    let (status, _, body) = send(&router, create).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 7);

    let (status, _, _) = send(&router, get("/customers/3/orders")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&router, get("/users?page=2")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upstream_errors_pass_through_unchanged() {
    let users = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Not Found", "message": "User 42 not found" })),
        )
        .mount(&users)
        .await;

    let router = gateway(&users.uri(), UNREACHABLE, UNREACHABLE, RateLimitConfig::default());
    let (status, _, body) = send(&router, get("/users/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User 42 not found");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let router = gateway(UNREACHABLE, UNREACHABLE, UNREACHABLE, RateLimitConfig::default());
    let (status, _, body) = send(&router, get("/products")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Bad Gateway");
}

#[tokio::test]
async fn clients_over_the_limit_get_429_with_headers() {
    let limit = RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
    };
    let router = gateway(UNREACHABLE, UNREACHABLE, UNREACHABLE, limit);

    let from = |ip: &str| {
        Request::builder()
            .uri("/health")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    };

    let (status, headers, _) = send(&router, from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[LIMIT_HEADER], "2");
    assert_eq!(headers[REMAINING_HEADER], "1");

    let (status, _, _) = send(&router, from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, body) = send(&router, from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers[REMAINING_HEADER], "0");
    assert_eq!(body["error"], "Too Many Requests");

    let (status, _, _) = send(&router, from("10.0.0.2")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn gateway_fronts_a_live_user_service() {
    let db = Arc::new(common::memory_db().await);
    let state = Arc::new(AppState::new(
        db,
        AppConfig::new("sqlite::memory:", "test"),
        "user-service",
    ));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, beauty_erp::user_router(state)).await.unwrap();
    });

    let base = format!("http://{addr}");
    let router = gateway(&base, UNREACHABLE, UNREACHABLE, RateLimitConfig::default());

    let create = Request::builder()
        .method(Method::POST)
        .uri("/user-types")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "user_type_id": 1, "type_name": "admin" }).to_string()))
        .unwrap();
    let (status, _, body) = send(&router, create).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, _, body) = send(&router, get("/user-types")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["type_name"], "admin");

    let (status, _, body) = send(&router, get("/users/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}
