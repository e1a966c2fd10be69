//! Collection listing: filters, sorting, projection and pagination.

mod common;

use std::collections::HashMap;

use oxcart::ApiError;

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn comparison_filters_narrow_the_result() {
    let state = common::state();
    for (title, price) in [("Cheap", 5.0), ("Mid", 50.0), ("Dear", 500.0)] {
        common::product(&state, title, price, 10).await;
    }

    let found = state.products.list(&params(&[("price[gte]", "50")])).await.unwrap();
    assert_eq!(found.len(), 2);

    let found = state
        .products
        .list(&params(&[("price[gt]", "5"), ("price[lt]", "500")]))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Mid");

    let found = state.products.list(&params(&[("brand", "Nobody")])).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn sort_and_projection() {
    let state = common::state();
    for (title, price) in [("A", 10.0), ("B", 30.0), ("C", 20.0)] {
        common::product(&state, title, price, 10).await;
    }

    let found = state
        .products
        .list(&params(&[("sort", "-price"), ("fields", "title,price")]))
        .await
        .unwrap();
    let titles: Vec<&str> = found.iter().map(|v| v["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["B", "C", "A"]);
    // projection keeps only the requested fields plus the id
    let keys: Vec<&String> = found[0].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
    assert!(found[0].get("_id").is_some());
    assert!(found[0].get("description").is_none());
}

#[tokio::test]
async fn pagination_windows_and_out_of_range() {
    let state = common::state();
    for i in 0..12 {
        common::product(&state, &format!("Item {i}"), 1.0 + i as f64, 10).await;
    }

    let page1 = state.products.list(&params(&[("page", "1"), ("limit", "10")])).await.unwrap();
    assert_eq!(page1.len(), 10);
    let page2 = state.products.list(&params(&[("page", "2"), ("limit", "10")])).await.unwrap();
    assert_eq!(page2.len(), 2);

    let err = state
        .products
        .list(&params(&[("page", "3"), ("limit", "10")]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::OutOfRange));
}

#[tokio::test]
async fn absurd_page_numbers_are_out_of_range_not_a_panic() {
    let state = common::state();
    common::product(&state, "Only", 1.0, 1).await;

    let huge = u64::MAX.to_string();
    let err = state
        .products
        .list(&params(&[("page", huge.as_str()), ("limit", "10")]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::OutOfRange));
}

#[tokio::test]
async fn unpaged_list_returns_everything() {
    let state = common::state();
    for i in 0..12 {
        common::product(&state, &format!("Item {i}"), 1.0, 10).await;
    }
    let found = state.products.list(&params(&[])).await.unwrap();
    assert_eq!(found.len(), 12);
}
