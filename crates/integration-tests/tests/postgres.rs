//! The same flows against `PostgreSQL`.
//!
//! These tests require a reachable database in `PC_HOUSE_DATABASE_URL` (or
//! `DATABASE_URL`). Migrations are applied on connect.
//!
//! Run with: cargo test -p pc-house-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use pc_house_api::db::{OrderRepository, PartRepository, PaymentRepository, PgStore, create_pool};
use pc_house_api::models::Review;
use pc_house_core::{OrderId, PartId, Rating, ReviewId, Uid};
use pc_house_integration_tests::{TestApp, order_body};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;

async fn pg_store() -> PgStore {
    let url = std::env::var("PC_HOUSE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("PC_HOUSE_DATABASE_URL must be set");
    let pool = create_pool(&SecretString::from(url)).await.unwrap();
    sqlx::migrate!("../api/migrations").run(&pool).await.unwrap();
    PgStore::new(pool)
}

/// Ids unique to one test run, since the database outlives it.
fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", OrderId::generate())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_order_and_payment_flow() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store.clone()));
    let admin = app.sign_in_admin(&unique("admin")).await;
    let buyer_uid = unique("buyer");
    let buyer = app.sign_in(&buyer_uid, "Buyer").await;
    let part_id = unique("gpu");
    app.add_part(&admin, &part_id, 50.0, 10).await;

    let placed = app
        .post("/place-order", Some(&buyer), order_body(&part_id, 2))
        .await;
    assert_eq!(placed.status, StatusCode::OK, "{}", placed.body);
    assert!((placed.body["order"]["unitPrice"].as_f64().unwrap() - 50.0).abs() < 1e-9);
    let order_id: OrderId = placed.body["order"]["_id"].as_str().unwrap().parse().unwrap();

    let part = app.get(&format!("/get-part/{part_id}"), None).await;
    assert_eq!(part.body["part"]["available"], 8);

    // Repricing the part leaves the placed order alone
    sqlx::query("UPDATE parts SET price = 99.00 WHERE id = $1")
        .bind(&part_id)
        .execute(store.pool())
        .await
        .unwrap();
    let order = store.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.unit_price.amount(), Decimal::from(50));

    let stored = app
        .patch(
            "/store-payment",
            Some(&buyer),
            json!({ "payment": { "orderId": order_id.to_string(), "txid": "pi_pg", "amount": 100 } }),
        )
        .await;
    assert_eq!(stored.status, StatusCode::OK, "{}", stored.body);

    let order = store.get_order(order_id).await.unwrap().unwrap();
    assert!(order.paid);
    assert_eq!(order.txid.as_deref(), Some("pi_pg"));
    let payments = store.payments_for_order(order_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].uid.as_str(), buyer_uid);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_part_conflicts() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store));
    let admin = app.sign_in_admin(&unique("admin")).await;
    let part_id = unique("ssd");
    app.add_part(&admin, &part_id, 80.0, 5).await;

    let again = app
        .post(
            "/add-product",
            Some(&admin),
            json!({
                "id": part_id,
                "name": "Other",
                "image": "https://img.example.com/x.png",
                "price": 1.0,
                "minimum": 1,
                "available": 1,
                "description": "dup"
            }),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let part = app
        .store()
        .get_part(&PartId::parse(&part_id).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(part.available, 5);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_missing_order_payment_records_nothing() {
    let store = pg_store().await;
    let missing = OrderId::generate();

    let payment = pc_house_api::models::Payment {
        id: pc_house_core::PaymentId::generate(),
        txid: "pi_ghost".to_string(),
        order_id: missing,
        uid: pc_house_core::Uid::parse("ghost").unwrap(),
        amount: None,
        payload: json!({}),
        created_at: chrono::Utc::now(),
    };
    assert!(store.record_payment(payment).await.unwrap().is_none());
    assert!(store.payments_for_order(missing).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_price_bounds_match_memory_store() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store));
    let admin = app.sign_in_admin(&unique("admin")).await;

    for price in [json!(0.001), json!(19.999), json!(2e10)] {
        let part_id = unique("bad");
        let response = app
            .post(
                "/add-product",
                Some(&admin),
                json!({
                    "id": part_id,
                    "name": "Bad price",
                    "image": "https://img.example.com/x.png",
                    "price": price,
                    "minimum": 1,
                    "available": 1,
                    "description": "Rejected"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{price}");
        let stored = app
            .store()
            .get_part(&PartId::parse(&part_id).unwrap())
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    let part_id = unique("top");
    let part = app.add_part(&admin, &part_id, 9_999_999_999.99, 1).await;
    assert!((part["price"].as_f64().unwrap() - 9_999_999_999.99).abs() < 1e-3);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_payment_amount_is_stored_as_submitted() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store.clone()));
    let admin = app.sign_in_admin(&unique("admin")).await;
    let buyer = app.sign_in(&unique("buyer"), "Buyer").await;
    let part_id = unique("cpu");
    app.add_part(&admin, &part_id, 19.99, 10).await;

    for (amount, expected) in [
        (json!(1e13), Decimal::new(10_000_000_000_000, 0)),
        (json!(12.345), Decimal::new(12_345, 3)),
    ] {
        let placed = app
            .post("/place-order", Some(&buyer), order_body(&part_id, 1))
            .await;
        let order_id: OrderId = placed.body["order"]["_id"].as_str().unwrap().parse().unwrap();

        let stored = app
            .patch(
                "/store-payment",
                Some(&buyer),
                json!({ "payment": { "orderId": order_id.to_string(), "txid": "pi_amt", "amount": amount } }),
            )
            .await;
        assert_eq!(stored.status, StatusCode::OK, "{}", stored.body);

        let payments = store.payments_for_order(order_id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Some(expected));
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_get_jwt_twice_keeps_one_row() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store));
    let uid = unique("user");
    app.sign_in(&uid, "Ann").await;

    let again = app
        .post("/get-jwt", None, json!({ "uid": uid, "name": "Ann B" }))
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let users = app.store().list_users().await.unwrap();
    let matching: Vec<_> = users.iter().filter(|u| u.uid.as_str() == uid).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].name.as_deref(), Some("Ann B"));
    assert_eq!(
        matching[0].email.as_deref(),
        Some(format!("{uid}@example.com").as_str())
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_profile_update_is_partial() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store));
    let uid = unique("user");
    let token = app.sign_in(&uid, "Ann").await;

    let updated = app
        .patch("/profile", Some(&token), json!({ "phone": "555-0101" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);

    let profile = app.get("/profile", Some(&token)).await;
    assert_eq!(profile.body["user"]["phone"], "555-0101");
    assert_eq!(profile.body["user"]["name"], "Ann");
    assert_eq!(profile.body["user"]["email"], format!("{uid}@example.com"));
    assert!(profile.body["user"]["address"].is_null());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_make_admin_stores_admin_role() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store));
    let admin = app.sign_in_admin(&unique("admin")).await;
    let uid = unique("user");
    let token = app.sign_in(&uid, "Bob").await;

    let response = app
        .send(Method::PUT, &format!("/make-admin/{uid}"), Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let profile = app.get("/profile", Some(&token)).await;
    assert_eq!(profile.body["user"]["role"], "admin");
    let check = app.get(&format!("/is-admin/{uid}"), None).await;
    assert_eq!(check.body["admin"], true);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_same_second_reviews_list_newest_inserted_first() {
    let store = pg_store().await;
    let app = TestApp::with_store(Arc::new(store));
    let uid = Uid::parse(&unique("reviewer")).unwrap();
    let now = chrono::Utc::now().timestamp();

    for text in ["first", "second"] {
        app.store()
            .insert_review(Review {
                id: ReviewId::generate(),
                rating: Rating::try_from(4_i16).unwrap(),
                text: text.to_string(),
                image: None,
                uid: uid.clone(),
                name: "Ann".to_string(),
                created_at: now,
            })
            .await
            .unwrap();
    }

    let listed = app.get(&format!("/get-reviews/{uid}"), None).await;
    let texts: Vec<_> = listed.body["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["second", "first"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_order_for_missing_part_stores_nothing() {
    let store = pg_store().await;
    let order = pc_house_api::models::Order {
        id: OrderId::generate(),
        product_id: PartId::parse(&unique("ghost")).unwrap(),
        product_name: "Ghost".to_string(),
        address: "1 Main St".to_string(),
        email: pc_house_core::Email::parse("buyer@example.com").unwrap(),
        name: "Buyer".to_string(),
        phone: "555-0100".to_string(),
        quantity: 1,
        unit_price: pc_house_core::Price::new(Decimal::from(10)).unwrap(),
        paid: false,
        status: pc_house_core::OrderStatus::Unpaid,
        uid: Uid::parse("buyer").unwrap(),
        txid: None,
        created_at: chrono::Utc::now(),
    };

    let result = store.place_order(order.clone()).await;
    assert!(matches!(result, Err(pc_house_api::db::RepositoryError::NotFound)));
    assert!(store.get_order(order.id).await.unwrap().is_none());
}
