mod common;

use axum::http::StatusCode;
use common::{decimal, error_fields, id_of, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

/// User `U001` with one customer, plus two lipstick variants.
async fn seeded() -> (TestApp, Value) {
    let app = TestApp::new().await;
    app.seed_user_type(1).await;
    app.seed_user("U001", 1).await;
    let customer = app.seed_customer("U001").await;
    let pid = id_of(&app.seed_product("Velvet Matte").await);
    app.seed_variant(pid, "VM-RUBY", 12.5, 40).await;
    app.seed_variant(pid, "VM-NUDE", 9.75, 40).await;
    (app, customer)
}

fn order_payload(customer_code: &str) -> Value {
    json!({
        "subtotal": 120.0,
        "discount": 20.0,
        "selected_items": [
            { "product_code": "VM-RUBY", "qty": 4 },
            { "product_code": "VM-NUDE", "qty": 8 },
        ],
        "customer_code": customer_code,
    })
}

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn order_payload_violations_are_all_reported() {
    let (app, _) = seeded().await;

    let (status, body) = app
        .post("/orders", json!({ "subtotal": "lots", "selected_items": {} }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let mut fields = error_fields(&body);
    fields.sort();
    assert_eq!(
        fields,
        vec!["customer_code", "discount", "selected_items", "subtotal"]
    );
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "selected_items" && e["message"] == "must be an array"));

    let (status, body) = app
        .post("/orders", json!({ "subtotal": 10, "discount": 0, "selected_items": [], "customer_code": "U001" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["selected_items"]);

    let (status, body) = app
        .post("/orders", json!({ "subtotal": 10, "discount": 11, "selected_items": [1], "customer_code": "U001" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["discount"]);
}

#[tokio::test]
async fn order_is_placed_for_the_customer_code() {
    let (app, customer) = seeded().await;

    let order = app.create("/orders", order_payload("U001")).await;
    assert_eq!(order["customer_id"], customer["id"]);
    assert_eq!(order["status"], "pending");
    assert_eq!(decimal(&order["net_total"]), dec!(100));
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    let (status, orders) = app
        .get(&format!("/customers/{}/orders", id_of(&customer)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["id"], order["id"]);

    let (status, page) = app.get("/orders?status=pending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 1);
}

#[tokio::test]
async fn unknown_customer_code_is_not_found() {
    let (app, _) = seeded().await;
    let (status, body) = app.post("/orders", order_payload("NOPE")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("NOPE"));

    let (status, _) = app.get("/customers/999/orders").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customers_with_orders_cannot_be_deleted() {
    let (app, customer) = seeded().await;
    app.create("/orders", order_payload("U001")).await;

    let (status, _) = app.delete(&format!("/customers/{}", id_of(&customer))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_status_follows_its_lifecycle() {
    let (app, _) = seeded().await;
    let order = app.create("/orders", order_payload("U001")).await;
    let uri = format!("/orders/{}", id_of(&order));

    let (status, updated) = app.put(&uri, json!({ "status": "processing" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "processing");

    let (status, updated) = app.put(&uri, json!({ "discount": 50 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&updated["net_total"]), dec!(70));

    let (status, _) = app.put(&uri, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.put(&uri, json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["status"]);

    let (status, body) = app.put(&uri, json!({ "status": "shipped" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["status"]);
}

#[tokio::test]
async fn quotation_totals_and_items_are_stored_together() {
    let (app, customer) = seeded().await;

    let quotation = app
        .create(
            "/quotations",
            json!({
                "quotation_id": "Q-0001",
                "customer_id": id_of(&customer),
                "discount": 5,
                "company": "Glow Salon",
                "items": [
                    { "item_code": "VM-RUBY", "item_qty": 2, "unit_price": 12.5 },
                    { "item_code": "VM-NUDE", "item_qty": 3, "unit_price": 9.75 },
                ],
            }),
        )
        .await;
    assert_eq!(quotation["status"], "draft");
    assert_eq!(quotation["no_items"], 2);
    assert_eq!(decimal(&quotation["sub_total"]), dec!(54.25));
    assert_eq!(decimal(&quotation["net_total"]), dec!(49.25));

    let (status, body) = app
        .get(&format!("/quotations/{}/items", id_of(&quotation)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let totals: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| decimal(&item["total_amount"]))
        .collect();
    assert_eq!(totals, vec![dec!(25), dec!(29.25)]);
}

#[tokio::test]
async fn quotation_with_unknown_item_is_rolled_back() {
    let (app, _) = seeded().await;
    let (status, _) = app
        .post(
            "/quotations",
            json!({
                "quotation_id": "Q-BAD",
                "items": [
                    { "item_code": "VM-RUBY", "item_qty": 1, "unit_price": 12.5 },
                    { "item_code": "GHOST", "item_qty": 1, "unit_price": 1 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, page) = app.get("/quotations?search=Q-BAD").await;
    assert_eq!(page["pagination"]["total"], 0);
}

#[tokio::test]
async fn invoicing_a_quotation_marks_it_invoiced_once() {
    let (app, _) = seeded().await;
    let quotation = app
        .create(
            "/quotations",
            json!({
                "quotation_id": "Q-0002",
                "items": [{ "item_code": "VM-RUBY", "item_qty": 4, "unit_price": 12.5 }],
            }),
        )
        .await;

    let (status, sent) = app
        .put(
            &format!("/quotations/{}/status", id_of(&quotation)),
            json!({ "status": "sent" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["status"], "sent");

    let invoice = app
        .create(
            "/invoices",
            json!({ "invoice_no": "INV-1", "quotation_id": "Q-0002", "cr_by": "U001" }),
        )
        .await;
    assert_eq!(invoice["invoice_no"], "INV-1");
    assert_eq!(invoice["quotation"]["status"], "invoiced");

    let (status, _) = app
        .post("/invoices", json!({ "invoice_no": "INV-2", "quotation_id": "Q-0002" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            &format!("/quotations/{}/status", id_of(&quotation)),
            json!({ "status": "draft" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/invoices", json!({ "invoice_no": "INV-3", "quotation_id": "Q-MISSING" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/quotations/{}", id_of(&quotation))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, orphan) = app.get(&format!("/invoices/{}", id_of(&invoice))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(orphan["quotation_id"].is_null());
    assert!(orphan["quotation"].is_null());
}

#[tokio::test]
async fn daily_reports_aggregate_the_day() {
    let (app, _) = seeded().await;
    app.create("/orders", order_payload("U001")).await;
    let second = app.create("/orders", order_payload("U001")).await;
    app.put(
        &format!("/orders/{}", id_of(&second)),
        json!({ "status": "cancelled" }),
    )
    .await;
    app.create(
        "/quotations",
        json!({
            "quotation_id": "Q-0003",
            "quotation_date": today(),
            "company": "Glow Salon",
            "payment_term": "30 days",
            "items": [{ "item_code": "VM-NUDE", "item_qty": 2, "unit_price": 9.75 }],
        }),
    )
    .await;
    app.create("/invoices", json!({ "invoice_no": "INV-9", "quotation_id": "Q-0003" }))
        .await;

    let (status, daily) = app.get(&format!("/report/daily-summary?date={}", today())).await;
    assert_eq!(status, StatusCode::OK, "{daily}");
    assert_eq!(daily["orders"]["count"], 2);
    assert_eq!(decimal(&daily["orders"]["net_total"]), dec!(200));
    assert_eq!(daily["orders"]["by_status"]["cancelled"], 1);
    assert_eq!(daily["quotations"]["count"], 1);

    let (status, qb) = app.get("/report/qb-summary").await;
    assert_eq!(status, StatusCode::OK, "{qb}");
    assert_eq!(qb["invoice_count"], 1);
    assert_eq!(decimal(&qb["net_total"]), dec!(19.5));
    assert_eq!(qb["lines"][0]["company"], "Glow Salon");
    assert_eq!(qb["lines"][0]["payment_term"], "30 days");

    let (status, empty) = app.get("/report/daily-summary?date=2001-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["orders"]["count"], 0);

    let (status, body) = app.get("/report/daily-summary?date=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["date"]);
}

#[tokio::test]
async fn documented_order_payloads() {
    let (app, _) = seeded().await;
    let valid = json!({
        "subtotal": 100,
        "discount": 10,
        "selected_items": [{ "product_code": "VM-RUBY", "qty": 1 }],
        "customer_code": "U001",
    });
    let order = app.create("/orders", valid.clone()).await;
    assert_eq!(decimal(&order["net_total"]), dec!(90));

    let mut missing = valid.clone();
    missing.as_object_mut().unwrap().remove("customer_code");
    let (status, body) = app.post("/orders", missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["customer_code"]);

    let mut not_array = valid;
    not_array["selected_items"] = json!("not-an-array");
    let (status, body) = app.post("/orders", not_array).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["selected_items"]);
}

#[tokio::test]
async fn quotation_and_invoice_numbers_are_unique() {
    let (app, _) = seeded().await;
    let quotation = json!({
        "quotation_id": "Q-DUP",
        "items": [{ "item_code": "VM-RUBY", "item_qty": 1, "unit_price": 12.5 }],
    });
    app.create("/quotations", quotation.clone()).await;
    let (status, _) = app.post("/quotations", quotation).await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.create("/invoices", json!({ "invoice_no": "INV-DUP" })).await;
    let (status, _) = app.post("/invoices", json!({ "invoice_no": "INV-DUP" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn variant_on_a_quotation_cannot_be_deleted() {
    let (app, _) = seeded().await;
    let pid = id_of(&app.seed_product("Glass Gloss").await);
    let gloss = app.seed_variant(pid, "GG-CLEAR", 8.0, 20).await;
    app.create(
        "/quotations",
        json!({
            "quotation_id": "Q-GLOSS",
            "items": [{ "item_code": "GG-CLEAR", "item_qty": 2, "unit_price": 8 }],
        }),
    )
    .await;

    let (status, body) = app.delete(&format!("/variants/{}", id_of(&gloss))).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (_, product) = app.get(&format!("/products/{pid}")).await;
    assert_eq!(product["no_variants"], 1);
}

#[tokio::test]
async fn customer_delete_succeeds_once_orders_are_gone() {
    let (app, customer) = seeded().await;
    let (status, _) = app.delete(&format!("/customers/{}", id_of(&customer))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn quotation_amount_overflow_is_a_validation_error() {
    let (app, _) = seeded().await;
    let (status, body) = app
        .post(
            "/quotations",
            json!({
                "quotation_id": "Q-HUGE",
                "items": [
                    { "item_code": "VM-RUBY", "item_qty": 1, "unit_price": 12.5 },
                    { "item_code": "VM-NUDE", "item_qty": 1000, "unit_price": "79228162514264337593543950335" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(error_fields(&body), vec!["items[1].unit_price"]);

    let (_, page) = app.get("/quotations?search=Q-HUGE").await;
    assert_eq!(page["pagination"]["total"], 0);
}
