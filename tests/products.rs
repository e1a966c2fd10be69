//! Product invariants: slug derivation, rating aggregation, wishlist toggling.

mod common;

use oxcart::models::product::{ProductUpdate, RatingPayload};

#[tokio::test]
async fn slug_follows_the_title() {
    let state = common::state();
    let product = common::product(&state, "Apple Watch SE!", 199.0, 5).await;
    assert_eq!(product.slug, "apple-watch-se");

    let updated = state
        .products
        .update(
            &product.id.unwrap().to_hex(),
            ProductUpdate { title: Some("Galaxy Watch 6".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, "galaxy-watch-6");
    assert_eq!(updated.title, "Galaxy Watch 6");
}

#[tokio::test]
async fn rating_twice_replaces_not_appends() {
    let state = common::state();
    let rater = common::register(&state, "rater@x.com").await;
    let product = common::product(&state, "Keyboard", 49.0, 10).await;
    let prod_id = product.id.unwrap().to_hex();

    let rated = state
        .products
        .rate(&rater, RatingPayload { prod_id: prod_id.clone(), star: 4, comment: None })
        .await
        .unwrap();
    assert_eq!(rated.ratings.len(), 1);
    assert_eq!(rated.total_ratings, 4);

    let rated = state
        .products
        .rate(&rater, RatingPayload { prod_id, star: 2, comment: Some("meh".to_string()) })
        .await
        .unwrap();
    assert_eq!(rated.ratings.len(), 1);
    assert_eq!(rated.ratings[0].star, 2);
    assert_eq!(rated.ratings[0].comment.as_deref(), Some("meh"));
    assert_eq!(rated.total_ratings, 2);
}

#[tokio::test]
async fn total_ratings_is_rounded_mean() {
    let state = common::state();
    let a = common::register(&state, "a@x.com").await;
    let b = common::register(&state, "b@x.com").await;
    let product = common::product(&state, "Mouse", 25.0, 10).await;
    let prod_id = product.id.unwrap().to_hex();

    state
        .products
        .rate(&a, RatingPayload { prod_id: prod_id.clone(), star: 2, comment: None })
        .await
        .unwrap();
    let rated = state
        .products
        .rate(&b, RatingPayload { prod_id, star: 5, comment: None })
        .await
        .unwrap();
    // mean of 2 and 5 is 3.5, rounded to 4
    assert_eq!(rated.ratings.len(), 2);
    assert_eq!(rated.total_ratings, 4);
}

#[tokio::test]
async fn wishlist_toggle_round_trips() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let product = common::product(&state, "Lamp", 15.0, 3).await;
    let prod_id = product.id.unwrap().to_hex();
    assert!(user.wishlist.is_empty());

    let user = state.products.toggle_wishlist(&user, &prod_id).await.unwrap();
    assert_eq!(user.wishlist, vec![product.id.unwrap()]);

    let user = state.products.toggle_wishlist(&user, &prod_id).await.unwrap();
    assert!(user.wishlist.is_empty());
}

#[tokio::test]
async fn malformed_id_is_a_validation_error() {
    let state = common::state();
    let err = state.products.get("not-an-object-id").await.unwrap_err();
    assert!(matches!(err, oxcart::ApiError::Validation(_)));
}
