//! # HTTP Routes
//!
//! ```text
//! GET  /health                 liveness, no store access
//! POST /api/checkout           cart → committed order
//! GET  /api/orders/{id}        order with its lines
//! GET  /api/report             sales summary (today, or startDate..=endDate)
//! GET  /api/report/hari-ini    same handler
//! GET    /api/products           catalog, optional ?name= filter
//! POST   /api/products           add a product to the catalog
//! GET    /api/products/{id}      product with current stock
//! PUT    /api/products/{id}      replace a product (restock, rename)
//! DELETE /api/products/{id}      remove a product never sold
//! GET    /api/categories         all categories
//! POST   /api/categories         add a category
//! GET    /api/categories/{id}    one category
//! PUT    /api/categories/{id}    rename or redescribe a category
//! DELETE /api/categories/{id}    remove a category; its products stay
//! ```
//!
//! Every body uses the `{"message", "data"}` envelope; failures add `code`.

pub mod categories;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod report;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/checkout", post(checkout::checkout))
        .route("/orders/{id}", get(orders::get_order))
        .route("/report", get(report::sales_summary))
        .route("/report/hari-ini", get(report::sales_summary))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use storefront_db::{Database, DbConfig};
    use storefront_service::LockStrategy;
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        create_router(AppState::new(db, LockStrategy::Pessimistic))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, uri, Some(body)).await
    }

    async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::PUT, uri, Some(body)).await
    }

    async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::DELETE, uri, None).await
    }

    async fn create_product(app: &Router, name: &str, price: i64, stock: i64) -> i64 {
        let (status, body) = post(
            app,
            "/api/products",
            json!({ "name": name, "price": price, "stock": stock }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn stock_of(app: &Router, id: i64) -> i64 {
        let (_, body) = get(app, &format!("/api/products/{id}")).await;
        body["data"]["stock"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_checkout_creates_order_and_takes_stock() {
        let app = app().await;
        let nasi = create_product(&app, "Nasi Goreng", 2500, 10).await;
        let teh = create_product(&app, "Es Teh", 500, 10).await;

        let (status, body) = post(
            &app,
            "/api/checkout",
            json!({ "items": [
                { "productId": nasi, "quantity": 2 },
                { "productId": teh, "quantity": 3 }
            ]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Checkout berhasil");
        assert_eq!(body["data"]["totalAmount"], 6500);
        let lines = body["data"]["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["productName"], "Nasi Goreng");
        assert_eq!(lines[0]["subtotal"], 5000);
        assert_eq!(lines[1]["quantity"], 3);

        assert_eq!(stock_of(&app, nasi).await, 8);
        assert_eq!(stock_of(&app, teh).await, 7);

        let order_id = body["data"]["id"].as_i64().unwrap();
        let (status, stored) = get(&app, &format!("/api/orders/{order_id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["data"], body["data"]);
    }

    #[tokio::test]
    async fn test_checkout_accepts_snake_case_product_id() {
        let app = app().await;
        let id = create_product(&app, "Bakso", 1500, 5).await;

        let (status, body) = post(
            &app,
            "/api/checkout",
            json!({ "items": [{ "product_id": id, "quantity": 1 }] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(stock_of(&app, id).await, 4);
    }

    #[tokio::test]
    async fn test_checkout_rejections() {
        let app = app().await;
        let id = create_product(&app, "Sate Ayam", 2800, 2).await;

        let (status, body) = post(&app, "/api/checkout", json!({ "items": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["data"].is_null());

        let (status, body) = post(
            &app,
            "/api/checkout",
            json!({ "items": [{ "productId": id, "quantity": 3 }] }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");

        let (status, body) = post(
            &app,
            "/api/checkout",
            json!({ "items": [
                { "productId": id, "quantity": 1 },
                { "productId": 999, "quantity": 1 }
            ]}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        assert_eq!(stock_of(&app, id).await, 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_bad_request() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/checkout")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"items\": [{\"productId\": \"one\"}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids() {
        let app = app().await;

        let (status, body) = get(&app, "/api/orders/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Order not found: 42");

        let (status, _) = get(&app, "/api/products/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_product_is_rejected() {
        let app = app().await;
        let (status, body) = post(
            &app,
            "/api/products",
            json!({ "name": "  ", "price": 100, "stock": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_product_list_update_and_delete() {
        let app = app().await;
        let kopi = create_product(&app, "Kopi Susu", 1800, 5).await;
        create_product(&app, "Es Kopi", 1500, 5).await;
        create_product(&app, "Teh Tarik", 1200, 5).await;

        let (status, body) = get(&app, "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (_, body) = get(&app, "/api/products?name=kopi").await;
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Kopi Susu", "Es Kopi"]);

        let (status, body) = put(
            &app,
            &format!("/api/products/{kopi}"),
            json!({ "name": "Kopi Susu Gula Aren", "price": 2000, "stock": 40 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Product updated successfully");
        assert_eq!(body["data"]["name"], "Kopi Susu Gula Aren");
        assert_eq!(stock_of(&app, kopi).await, 40);

        let (status, body) = put(
            &app,
            "/api/products/404",
            json!({ "name": "Ghost", "price": 1, "stock": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) = put(
            &app,
            &format!("/api/products/{kopi}"),
            json!({ "name": "Kopi", "price": -5, "stock": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = delete(&app, &format!("/api/products/{kopi}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");
        let (status, _) = get(&app, &format!("/api/products/{kopi}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = delete(&app, &format!("/api/products/{kopi}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sold_product_cannot_be_deleted() {
        let app = app().await;
        let id = create_product(&app, "Bakso", 2000, 5).await;
        post(
            &app,
            "/api/checkout",
            json!({ "items": [{ "productId": id, "quantity": 1 }] }),
        )
        .await;

        let (status, body) = delete(&app, &format!("/api/products/{id}")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(stock_of(&app, id).await, 4);
    }

    #[tokio::test]
    async fn test_category_crud_and_product_join() {
        let app = app().await;

        let (status, body) = post(
            &app,
            "/api/categories",
            json!({ "name": "Minuman", "description": "Panas dan dingin" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "Category created successfully");
        let drinks = body["data"]["id"].as_i64().unwrap();

        let (status, body) = post(
            &app,
            "/api/products",
            json!({ "name": "Es Teh", "price": 500, "stock": 10, "categoryId": drinks }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["categoryName"], "Minuman");
        let teh = body["data"]["id"].as_i64().unwrap();

        let (status, body) = post(
            &app,
            "/api/products",
            json!({ "name": "Es Jeruk", "price": 700, "stock": 10, "categoryId": 999 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Category not found: 999");

        let (status, body) = put(
            &app,
            &format!("/api/categories/{drinks}"),
            json!({ "name": "Minuman Dingin" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Minuman Dingin");
        assert!(body["data"]["description"].is_null());

        let (_, body) = get(&app, &format!("/api/products/{teh}")).await;
        assert_eq!(body["data"]["categoryName"], "Minuman Dingin");

        let (_, body) = get(&app, "/api/categories").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = post(&app, "/api/categories", json!({ "name": " " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = delete(&app, &format!("/api/categories/{drinks}")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(&app, &format!("/api/categories/{drinks}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = get(&app, &format!("/api/products/{teh}")).await;
        assert!(body["data"]["categoryId"].is_null());
        assert!(body["data"]["categoryName"].is_null());
    }

    #[tokio::test]
    async fn test_report_today() {
        let app = app().await;
        let a = create_product(&app, "Product A", 100, 10).await;
        let b = create_product(&app, "Product B", 50, 10).await;

        post(
            &app,
            "/api/checkout",
            json!({ "items": [
                { "productId": a, "quantity": 3 },
                { "productId": b, "quantity": 5 }
            ]}),
        )
        .await;

        for uri in ["/api/report", "/api/report/hari-ini", "/api/report?startDate=&endDate="] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}: {body}");
            assert_eq!(body["data"]["totalRevenue"], 550);
            assert_eq!(body["data"]["orderCount"], 1);
            assert_eq!(body["data"]["topSeller"]["name"], "Product B");
            assert_eq!(body["data"]["topSeller"]["quantitySold"], 5);
        }
    }

    #[tokio::test]
    async fn test_report_range() {
        let app = app().await;
        let a = create_product(&app, "Product A", 100, 10).await;
        post(
            &app,
            "/api/checkout",
            json!({ "items": [{ "productId": a, "quantity": 1 }] }),
        )
        .await;

        let (status, body) = get(&app, "/api/report?start_date=2000-01-01&end_date=2000-01-31").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalRevenue"], 0);
        assert_eq!(body["data"]["orderCount"], 0);
        assert!(body["data"]["topSeller"].is_null());

        let (status, body) = get(&app, "/api/report?startDate=2000-02-01&endDate=2000-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = get(&app, "/api/report?startDate=01/01/2000&endDate=2000-01-31").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
