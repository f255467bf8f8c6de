//! Handler tests for the Products domain
//!
//! These drive the products router directly with `oneshot`:
//! - Status codes for every route, including the empty-collection 204s
//! - Request body and path rejection
//! - Whether a failed request ever reaches `save()`

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use database::Flushed;
use domain_products::*;
use http_body_util::BodyExt;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_len(body: Body) -> usize {
    body.collect().await.unwrap().to_bytes().len()
}

fn app(db: &TestDatabase) -> Router {
    handlers::router(ProductUnitOfWorkFactory::new(db.connection()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Counts calls to `save()` on every unit of work it hands out
#[derive(Clone)]
struct CountingFactory {
    inner: ProductUnitOfWorkFactory,
    saves: Arc<AtomicUsize>,
}

impl CountingFactory {
    fn new(db: &TestDatabase) -> Self {
        Self {
            inner: ProductUnitOfWorkFactory::new(db.connection()),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

struct CountingWork {
    inner: ProductUnitOfWork,
    saves: Arc<AtomicUsize>,
}

#[async_trait]
impl UnitOfWork for CountingWork {
    type Products = PgProductRepository;

    fn products(&self) -> &PgProductRepository {
        self.inner.products()
    }

    async fn save(&self) -> ProductResult<Flushed<Product>> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save().await
    }
}

impl UnitOfWorkFactory for CountingFactory {
    type Work = CountingWork;

    fn begin(&self) -> CountingWork {
        CountingWork {
            inner: self.inner.begin(),
            saves: self.saves.clone(),
        }
    }
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_get_product_returns_200() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({
            "id": 1,
            "name": "Product 1",
            "description": "Description 1",
            "price": 10.0,
            "isAvailable": true
        })
    );
}

#[tokio::test]
async fn test_get_product_absent_returns_404() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/404")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_product_non_integer_id_returns_400() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_returns_all() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_products_empty_store_returns_204() {
    let db = TestDatabase::empty().await;

    let response = app(&db).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_len(response.into_body()).await, 0);
}

#[tokio::test]
async fn test_list_product_range() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/1/5")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_list_product_range_past_end_returns_204() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/3/2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_product_range_rejects_bad_bounds() {
    let db = TestDatabase::new().await;

    for uri in ["/-1/2", "/0/x", "/9223372036854775808/1"] {
        let response = app(&db).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_list_available_products() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(get("/available")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_list_available_products_none_returns_204() {
    let db = TestDatabase::empty().await;
    db.insert_product(1, "Hidden", "5.00", false).await;

    let response = app(&db).oneshot(get("/available")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_product_with_id_returns_201_and_location() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_create_with_id");
    let name = builder.name("product", "main");

    let request = send_json(
        "POST",
        "/",
        json!({
            "id": 10,
            "name": name,
            "description": "Handler test",
            "price": builder.price().to_f64().unwrap(),
            "isAvailable": true
        }),
    );

    let response = app(&db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/products/10"
    );

    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.id, 10);
    assert_eq!(created.name, name);

    let response = app(&db).oneshot(get("/10")).await.unwrap();
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, name);
    assert_eq!(product.price, builder.price());
    assert!(product.is_available);
}

#[tokio::test]
async fn test_create_product_without_id_returns_201() {
    let db = TestDatabase::new().await;

    let request = send_json(
        "POST",
        "/",
        json!({
            "name": "Kettle",
            "description": "Stainless steel",
            "price": 24.5
        }),
    );

    let response = app(&db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/products/4"
    );
    assert_eq!(db.count_products().await, 4);

    let created: Value = json_body(response.into_body()).await;
    assert_eq!(
        created,
        json!({
            "id": 4,
            "name": "Kettle",
            "description": "Stainless steel",
            "price": 24.5,
            "isAvailable": false
        })
    );

    // isAvailable defaults to false
    let response = app(&db).oneshot(get("/4")).await.unwrap();
    let product: Product = json_body(response.into_body()).await;
    assert!(!product.is_available);
}

#[tokio::test]
async fn test_create_after_client_id_assigns_next_id() {
    let db = TestDatabase::new().await;

    let with_id = send_json(
        "POST",
        "/",
        json!({ "id": 4, "name": "a", "description": "client keyed", "price": 1.5 }),
    );
    let response = app(&db).oneshot(with_id).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let without_id = send_json(
        "POST",
        "/",
        json!({ "name": "c", "description": "store keyed", "price": 2.5 }),
    );
    let response = app(&db).oneshot(without_id).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/products/5"
    );

    let created: Product = json_body(response.into_body()).await;
    assert_eq!(created.id, 5);
    assert_eq!(db.count_products().await, 5);
}

#[tokio::test]
async fn test_create_product_without_body_returns_400() {
    let db = TestDatabase::new().await;
    let factory = CountingFactory::new(&db);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = handlers::router(factory.clone())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(factory.saves(), 0);
    assert_eq!(db.count_products().await, 3);
}

#[tokio::test]
async fn test_create_product_validates_price() {
    let db = TestDatabase::new().await;
    let factory = CountingFactory::new(&db);

    let request = send_json(
        "POST",
        "/",
        json!({
            "name": "Scale",
            "description": "Too precise",
            "price": 1.125
        }),
    );

    let response = handlers::router(factory.clone())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(factory.saves(), 0);
    assert_eq!(db.count_products().await, 3);
}

#[tokio::test]
async fn test_create_product_missing_field_returns_400() {
    let db = TestDatabase::new().await;

    let request = send_json("POST", "/", json!({ "name": "No price" }));

    let response = app(&db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(db.count_products().await, 3);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_product_returns_204() {
    let db = TestDatabase::new().await;

    let request = send_json(
        "PUT",
        "/3",
        json!({
            // Route id wins over the body
            "id": 99,
            "name": "Product 3",
            "description": "Back in stock",
            "price": 27.75,
            "isAvailable": true
        }),
    );

    let response = app(&db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app(&db).oneshot(get("/3")).await.unwrap();
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.description, "Back in stock");
    assert!(product.is_available);

    let response = app(&db).oneshot(get("/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let db = TestDatabase::new().await;

    let request = send_json(
        "PUT",
        "/50",
        json!({
            "name": "Ghost",
            "description": "Never existed",
            "price": 1.5
        }),
    );

    let response = app(&db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(db.count_products().await, 3);
}

#[tokio::test]
async fn test_update_without_body_returns_400() {
    let db = TestDatabase::new().await;
    let factory = CountingFactory::new(&db);

    let request = Request::builder()
        .method("PUT")
        .uri("/1")
        .body(Body::empty())
        .unwrap();

    let response = handlers::router(factory.clone())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(factory.saves(), 0);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_product_returns_204() {
    let db = TestDatabase::new().await;

    let response = app(&db).oneshot(delete("/2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(db.count_products().await, 2);

    let response = app(&db).oneshot(get("/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_absent_product_returns_404() {
    let db = TestDatabase::new().await;
    let factory = CountingFactory::new(&db);

    let response = handlers::router(factory.clone())
        .oneshot(delete("/77"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(factory.saves(), 0);
    assert_eq!(db.count_products().await, 3);
}
