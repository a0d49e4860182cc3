mod common;

use axum::http::StatusCode;
use common::{decimal, error_fields, id_of, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn variant_count_follows_inserts_moves_and_deletes() {
    let app = TestApp::new().await;
    let lipstick = app.seed_product("Velvet Matte").await;
    let gloss = app.seed_product("Glass Gloss").await;
    assert_eq!(lipstick["no_variants"], 0);

    let ruby = app.seed_variant(id_of(&lipstick), "VM-RUBY", 12.5, 40).await;
    app.seed_variant(id_of(&lipstick), "VM-NUDE", 12.5, 3).await;

    let (_, product) = app.get(&format!("/products/{}", id_of(&lipstick))).await;
    assert_eq!(product["no_variants"], 2);

    let (status, moved) = app
        .put(
            &format!("/variants/{}", id_of(&ruby)),
            json!({ "product_id": id_of(&gloss) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{moved}");

    let (_, product) = app.get(&format!("/products/{}", id_of(&lipstick))).await;
    assert_eq!(product["no_variants"], 1);
    let (_, product) = app.get(&format!("/products/{}", id_of(&gloss))).await;
    assert_eq!(product["no_variants"], 1);

    let (status, _) = app.delete(&format!("/variants/{}", id_of(&ruby))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, product) = app.get(&format!("/products/{}", id_of(&gloss))).await;
    assert_eq!(product["no_variants"], 0);
}

#[tokio::test]
async fn product_with_variants_and_variant_parent() {
    let app = TestApp::new().await;
    let product = app.seed_product("Velvet Matte").await;
    let pid = id_of(&product);
    app.seed_variant(pid, "VM-RUBY", 12.5, 40).await;
    let nude = app.seed_variant(pid, "VM-NUDE", 11.0, 3).await;
    assert_eq!(decimal(&nude["price"]), dec!(11));

    let (status, body) = app.get(&format!("/products/{pid}/variants")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Velvet Matte");
    let codes: Vec<_> = body["variants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["product_code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["VM-NUDE", "VM-RUBY"]);

    let (status, parent) = app.get(&format!("/variants/{}/product", id_of(&nude))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parent["id"], pid);

    let (status, page) = app.get(&format!("/variants?product_id={pid}&per_page=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["pagination"]["total"], 2);
    assert_eq!(page["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn low_stock_lists_variants_at_or_below_reorder_level() {
    let app = TestApp::new().await;
    let pid = id_of(&app.seed_product("Velvet Matte").await);
    app.seed_variant(pid, "VM-RUBY", 12.5, 40).await;
    app.seed_variant(pid, "VM-NUDE", 12.5, 5).await;
    app.seed_variant(pid, "VM-PLUM", 12.5, 1).await;

    let (status, body) = app.get("/variants/low-stock").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["product_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["VM-PLUM", "VM-NUDE"]);
}

#[tokio::test]
async fn deleting_a_product_removes_its_variants() {
    let app = TestApp::new().await;
    let pid = id_of(&app.seed_product("Velvet Matte").await);
    let variant = app.seed_variant(pid, "VM-RUBY", 12.5, 40).await;

    let (status, _) = app.delete(&format!("/products/{pid}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/variants/{}", id_of(&variant))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn variant_rules_are_enforced() {
    let app = TestApp::new().await;
    let pid = id_of(&app.seed_product("Velvet Matte").await);
    app.seed_variant(pid, "VM-RUBY", 12.5, 40).await;

    let (status, _) = app
        .post("/variants", json!({ "product_id": pid, "product_code": "VM-RUBY", "price": 9 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post("/variants", json!({ "product_id": 999, "product_code": "GHOST", "price": 9 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .post(
            "/variants",
            json!({
                "product_id": pid,
                "product_code": "VM-OLD",
                "price": 9,
                "mfd_date": "2024-06-01",
                "exp_date": "2024-01-01",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["exp_date"]);

    let (status, body) = app
        .post("/variants", json!({ "product_id": pid, "product_code": "VM-NEG", "price": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_fields(&body).contains(&"price".to_string()));

    let (_, product) = app.get(&format!("/products/{pid}")).await;
    assert_eq!(product["no_variants"], 1);
}

#[tokio::test]
async fn product_payload_is_validated() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/products", json!({ "category": 7 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = error_fields(&body);
    assert!(fields.contains(&"category".to_string()));
    assert!(fields.contains(&"name".to_string()));

    let (status, _) = app.get("/products/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_names_are_unique() {
    let app = TestApp::new().await;
    app.seed_product("Velvet Matte").await;
    let (status, body) = app
        .post("/products", json!({ "category": "Lipstick", "name": "Velvet Matte" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn far_out_page_is_empty_not_an_error() {
    let app = TestApp::new().await;
    app.seed_product("Velvet Matte").await;

    let (status, page) = app
        .get("/products?page=18446744073709551615&per_page=100")
        .await;
    assert_eq!(status, StatusCode::OK, "{page}");
    assert!(page["data"].as_array().unwrap().is_empty());
    assert_eq!(page["pagination"]["total"], 1);
}
