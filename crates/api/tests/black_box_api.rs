use reqwest::StatusCode;
use serde_json::json;

use relaycrm_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_customer(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    email: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/customers", base_url))
        .json(&json!({ "name": name, "email": email }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/products", base_url))
        .json(&json!({ "name": name, "price_cents": price_cents, "stock": stock }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoint_is_up() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn customer_create_then_duplicate_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_customer(&client, &srv.base_url, "John Doe", "john@example.com").await;
    assert_eq!(created["email"], "john@example.com");

    let res = client
        .post(format!("{}/customers", srv.base_url))
        .json(&json!({ "name": "Impostor", "email": "john@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate_email");
}

#[tokio::test]
async fn customer_missing_fields_is_a_validation_error() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(format!("{}/customers", srv.base_url))
        .json(&json!({ "name": "", "email": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn product_price_and_stock_boundaries() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // stock defaults to 0 and zero stock is fine
    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({ "name": "Phone", "price_cents": 49_999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["stock"], 0);

    // price = 0 is rejected
    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({ "name": "Freebie", "price_cents": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // negative stock is rejected
    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({ "name": "Phantom", "price_cents": 100, "stock": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_creation_totals_the_product_prices() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let customer = create_customer(&client, &srv.base_url, "John Doe", "john@example.com").await;
    let phone = create_product(&client, &srv.base_url, "Phone", 49_999, 20).await;
    let tablet = create_product(&client, &srv.base_url, "Tablet", 29_999, 15).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": customer["id"],
            "product_ids": [phone["id"], tablet["id"]],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["total_amount_cents"], 79_998);
    assert_eq!(order["product_ids"].as_array().unwrap().len(), 2);

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn order_with_unknown_customer_creates_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, "Phone", 49_999, 20).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": "00000000-0000-7000-8000-000000000999",
            "product_ids": [product["id"]],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_customer");

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_with_malformed_ids_is_a_bad_request() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "customer_id": "not-a-uuid", "product_ids": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn bulk_import_reports_partial_success() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/customers/bulk", srv.base_url))
        .json(&json!({
            "customers": [
                { "name": "A", "email": "a@x.com" },
                { "email": "b@x.com" },
                { "name": "C", "email": "a@x.com" },
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let created = body["created"].as_array().unwrap();
    let errors = body["errors"].as_array().unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["email"], "a@x.com");
    assert_eq!(errors.len(), 2);
    assert!(errors[0]
        .as_str()
        .unwrap()
        .starts_with("Missing required fields for "));
    assert_eq!(errors[1], "Duplicate email: a@x.com");

    let res = client
        .get(format!("{}/customers", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}
