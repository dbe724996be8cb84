// tests/http_tests.rs
mod common;

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::*;
use kart::model::{CouponCode, OrderId};
use kart_app::web::configure_app_routes;

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn order_request(body: Value) -> test::TestRequest {
  test::TestRequest::post()
    .uri("/order")
    .insert_header(("api_key", TEST_API_KEY))
    .set_json(body)
}

#[actix_web::test]
async fn test_health_reports_ok() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn test_list_products_reports_prices_in_major_units() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/product").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  let products = body.as_array().expect("array body");
  assert_eq!(products.len(), 3);
  let waffle = products.iter().find(|p| p["id"] == "1").expect("product 1 listed");
  assert_eq!(waffle["name"], "Chicken Waffle");
  assert_eq!(waffle["category"], "Waffle");
  assert_eq!(waffle["price"], 6.5);
}

#[actix_web::test]
async fn test_get_product_by_id() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/product/10").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["id"], "10");
  assert_eq!(body["price"], 12.0);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/product/99").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("99"));
}

#[actix_web::test]
async fn test_order_requires_api_key() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);
  let body = json!({ "items": [{ "productId": "1", "quantity": 1 }] });

  let missing = test::TestRequest::post().uri("/order").set_json(body.clone()).to_request();
  assert_eq!(test::call_service(&app, missing).await.status(), StatusCode::UNAUTHORIZED);

  let wrong = test::TestRequest::post()
    .uri("/order")
    .insert_header(("api_key", "nope"))
    .set_json(body)
    .to_request();
  assert_eq!(test::call_service(&app, wrong).await.status(), StatusCode::UNAUTHORIZED);

  assert!(t.orders.orders().is_empty());
}

#[actix_web::test]
async fn test_place_order_with_coupon() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  let req = order_request(json!({
    "couponCode": "SAVE20AA",
    "items": [
      { "productId": "1", "quantity": 2 },
      { "productId": "1", "quantity": 3 },
      { "productId": "10", "quantity": 1 }
    ]
  }))
  .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body["items"],
    json!([
      { "productId": "1", "quantity": 2 },
      { "productId": "1", "quantity": 3 },
      { "productId": "10", "quantity": 1 }
    ])
  );
  let product_ids: Vec<&str> = body["products"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["id"].as_str().unwrap())
    .collect();
  assert_eq!(product_ids, vec!["1", "10"]);

  let order_id: OrderId = serde_json::from_value(body["id"].clone()).expect("uuid order id");
  assert_eq!(t.orders.items_for(order_id).len(), 3);
  assert!(t.orders.is_redeemed(&CouponCode::new("SAVE20AA")));
}

#[actix_web::test]
async fn test_coupon_failures_map_to_statuses() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);
  let with_coupon = |code: &str| {
    order_request(json!({ "couponCode": code, "items": [{ "productId": "1", "quantity": 1 }] })).to_request()
  };

  // Too short
  assert_eq!(test::call_service(&app, with_coupon("ABC")).await.status(), StatusCode::UNPROCESSABLE_ENTITY);
  // Unknown
  assert_eq!(test::call_service(&app, with_coupon("MISSING01")).await.status(), StatusCode::NOT_FOUND);
  // One category only
  assert_eq!(test::call_service(&app, with_coupon("ONEONLY1")).await.status(), StatusCode::UNPROCESSABLE_ENTITY);

  assert_eq!(test::call_service(&app, with_coupon("SAVE20AA")).await.status(), StatusCode::OK);
  let resp = test::call_service(&app, with_coupon("SAVE20AA")).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "error": "Coupon already redeemed: SAVE20AA" }));

  assert_eq!(t.orders.orders().len(), 1);
}

#[actix_web::test]
async fn test_malformed_bodies_are_bad_requests() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  let unknown_field = order_request(json!({ "items": [{ "productId": "1", "quantity": 1 }], "discount": 10 })).to_request();
  let resp = test::call_service(&app, unknown_field).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].is_string());

  let not_json = test::TestRequest::post()
    .uri("/order")
    .insert_header(("api_key", TEST_API_KEY))
    .insert_header(ContentType::json())
    .set_payload("{ items: ")
    .to_request();
  assert_eq!(test::call_service(&app, not_json).await.status(), StatusCode::BAD_REQUEST);

  let wrong_type = order_request(json!({ "items": [{ "productId": "1", "quantity": "two" }] })).to_request();
  assert_eq!(test::call_service(&app, wrong_type).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_item_rules_are_unprocessable() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  for body in [
    json!({ "items": [] }),
    json!({ "items": [{ "productId": "", "quantity": 1 }] }),
    json!({ "items": [{ "productId": "1", "quantity": 0 }] }),
    json!({ "items": [{ "productId": "1", "quantity": -1 }] }),
  ] {
    let resp = test::call_service(&app, order_request(body.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
  }
  assert_eq!(t.orders.write_attempts(), 0);
}

#[actix_web::test]
async fn test_unknown_product_is_not_found() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);

  let req = order_request(json!({ "items": [{ "productId": "99", "quantity": 1 }] })).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "error": "Product(s) not found: 99" }));
}

#[actix_web::test]
async fn test_idempotency_key_prevents_double_placement() {
  setup_tracing();
  let t = test_app();
  let app = init_app!(t.state);
  let key = "6f1c1c9e-2b4a-4d8e-9a51-3c2f8f0e7b11";
  let body = json!({ "items": [{ "productId": "2", "quantity": 1 }] });

  let first = order_request(body.clone()).insert_header(("Idempotency-Key", key)).to_request();
  let resp = test::call_service(&app, first).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let placed: Value = test::read_body_json(resp).await;
  assert_eq!(placed["id"], key);

  let retry = order_request(body.clone()).insert_header(("Idempotency-Key", key)).to_request();
  assert_eq!(test::call_service(&app, retry).await.status(), StatusCode::CONFLICT);
  assert_eq!(t.orders.orders().len(), 1);

  let garbage = order_request(body).insert_header(("Idempotency-Key", "not-a-uuid")).to_request();
  assert_eq!(test::call_service(&app, garbage).await.status(), StatusCode::BAD_REQUEST);
}
