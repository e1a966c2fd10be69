//! Cart assembly, coupon application and cash-on-delivery checkout.

mod common;

use oxcart::models::cart::{CartItemPayload, CheckoutPayload};
use oxcart::models::coupon::CouponPayload;
use oxcart::models::order::{OrderStatus, OrderStatusPayload};
use oxcart::state::AppState;
use oxcart::ApiError;

fn line(prod_id: &str, count: i64) -> CartItemPayload {
    CartItemPayload { prod_id: prod_id.to_string(), count, color: Some("red".to_string()) }
}

async fn coupon(state: &AppState, name: &str, discount: f64) {
    state
        .coupons
        .create(CouponPayload {
            name: name.to_string(),
            expiry: chrono::Utc::now() + chrono::Duration::days(30),
            discount,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn cart_total_uses_live_catalog_prices() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    let prod_id = product.id.unwrap().to_hex();

    let cart = state.shopping.set_cart(&user, vec![line(&prod_id, 2)]).await.unwrap();
    assert_eq!(cart.cart_total, 20.0);
    assert_eq!(cart.products.len(), 1);
    assert_eq!(cart.products[0].price, 10.0);

    // re-setting the cart replaces it and re-reads the price from the catalog
    state
        .products
        .update(
            &prod_id,
            oxcart::models::product::ProductUpdate { price: Some(12.5), ..Default::default() },
        )
        .await
        .unwrap();
    let cart = state.shopping.set_cart(&user, vec![line(&prod_id, 2)]).await.unwrap();
    assert_eq!(cart.cart_total, 25.0);

    let populated = state.shopping.get_cart(&user).await.unwrap();
    assert_eq!(populated["cart_total"], 25.0);
    assert_eq!(populated["products"][0]["product"]["title"], "Widget");
}

#[tokio::test]
async fn unknown_coupon_leaves_the_cart_alone() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    state
        .shopping
        .set_cart(&user, vec![line(&product.id.unwrap().to_hex(), 2)])
        .await
        .unwrap();

    let err = state.shopping.apply_coupon(&user, "NOSUCH").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidCoupon));
    let cart = state.shopping.get_cart(&user).await.unwrap();
    assert!(cart.get("total_after_discount").is_none());
}

#[tokio::test]
async fn coupon_needs_an_active_cart() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    coupon(&state, "SAVE10", 10.0).await;

    let err = state.shopping.apply_coupon(&user, "SAVE10").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("cart")));
}

#[tokio::test]
async fn non_cod_checkout_changes_nothing() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    let prod_id = product.id.unwrap().to_hex();
    state.shopping.set_cart(&user, vec![line(&prod_id, 2)]).await.unwrap();

    let err = state
        .shopping
        .checkout(&user, CheckoutPayload { cod: false, coupon_applied: false })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert!(state.shopping.orders_for(&user).await.unwrap().is_empty());
    let untouched = state.products.get(&prod_id).await.unwrap();
    assert_eq!(untouched.quantity, 100);
    assert_eq!(untouched.sold, 0);
}

/// The storefront happy path: cart at 20.00, a 10% coupon brings it to
/// 18.00, COD checkout snapshots the order and moves stock.
#[tokio::test]
async fn end_to_end_checkout() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    let prod_id = product.id.unwrap().to_hex();
    coupon(&state, "save10", 10.0).await;

    let cart = state.shopping.set_cart(&user, vec![line(&prod_id, 2)]).await.unwrap();
    assert_eq!(cart.cart_total, 20.0);

    // codes match case-insensitively because they are stored uppercase
    let discounted = state.shopping.apply_coupon(&user, "save10").await.unwrap();
    assert_eq!(discounted, 18.0);

    let order = state
        .shopping
        .checkout(&user, CheckoutPayload { cod: true, coupon_applied: true })
        .await
        .unwrap();
    assert_eq!(order.order_status, OrderStatus::CashOnDelivery);
    assert_eq!(order.payment_intent.amount, 18.0);
    assert_eq!(order.payment_intent.method, "COD");
    assert_eq!(order.products.len(), 1);
    assert_eq!(order.products[0].count, 2);

    let product = state.products.get(&prod_id).await.unwrap();
    assert_eq!(product.quantity, 98);
    assert_eq!(product.sold, 2);

    let orders = state.shopping.orders_for(&user).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["products"][0]["product"]["title"], "Widget");
    assert_eq!(orders[0]["order_by"]["email"], "a@x.com");
}

#[tokio::test]
async fn checkout_without_coupon_charges_the_full_total() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    state
        .shopping
        .set_cart(&user, vec![line(&product.id.unwrap().to_hex(), 3)])
        .await
        .unwrap();

    let order = state
        .shopping
        .checkout(&user, CheckoutPayload { cod: true, coupon_applied: false })
        .await
        .unwrap();
    assert_eq!(order.payment_intent.amount, 30.0);
}

#[tokio::test]
async fn order_status_update_mirrors_into_the_payment_intent() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    state
        .shopping
        .set_cart(&user, vec![line(&product.id.unwrap().to_hex(), 1)])
        .await
        .unwrap();
    let order = state
        .shopping
        .checkout(&user, CheckoutPayload { cod: true, coupon_applied: false })
        .await
        .unwrap();

    let updated = state
        .shopping
        .update_order_status(
            &order.id.unwrap().to_hex(),
            OrderStatusPayload { status: OrderStatus::Dispatched },
        )
        .await
        .unwrap();
    assert_eq!(updated.order_status, OrderStatus::Dispatched);
    assert_eq!(updated.payment_intent.status, OrderStatus::Dispatched);
}

/// Over HTTP the checkout endpoint acknowledges with a message envelope,
/// not the order document.
#[tokio::test]
async fn checkout_endpoint_replies_with_a_success_message() {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    state
        .shopping
        .set_cart(&user, vec![line(&product.id.unwrap().to_hex(), 2)])
        .await
        .unwrap();
    let token = state.credentials.issue_access_token(user.id.unwrap()).unwrap();

    let app = oxcart::routes::router(state);
    let response = app
        .oneshot(
            Request::post("/api/user/cart/create-order")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"COD":true,"coupon_applied":false}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "success");
}

#[tokio::test]
async fn empty_cart_removes_it() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Widget", 10.0, 100).await;
    state
        .shopping
        .set_cart(&user, vec![line(&product.id.unwrap().to_hex(), 1)])
        .await
        .unwrap();

    let emptied = state.shopping.empty_cart(&user).await.unwrap();
    assert_eq!(emptied.cart_total, 10.0);
    let err = state.shopping.get_cart(&user).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("cart")));
}
