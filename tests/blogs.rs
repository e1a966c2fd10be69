//! Blog view counting and the mutually exclusive like/dislike toggles.

mod common;

use oxcart::models::blog::BlogPayload;
use oxcart::models::Blog;
use oxcart::state::AppState;

async fn blog(state: &AppState, title: &str) -> Blog {
    state
        .blogs
        .create(BlogPayload {
            title: title.to_string(),
            description: "words".to_string(),
            category: "news".to_string(),
            author: None,
            images: Vec::new(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn reading_counts_views() {
    let state = common::state();
    let blog = blog(&state, "Launch Day").await;
    assert_eq!(blog.num_views, 0);
    assert_eq!(blog.slug, "launch-day");
    assert_eq!(blog.author, "Admin");

    let id = blog.id.unwrap().to_hex();
    let read = state.blogs.get(&id).await.unwrap();
    assert_eq!(read.num_views, 1);
    let read = state.blogs.get(&id).await.unwrap();
    assert_eq!(read.num_views, 2);
}

#[tokio::test]
async fn like_clears_a_previous_dislike() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let user_id = user.id.unwrap();
    let blog = blog(&state, "Hot Take").await;
    let id = blog.id.unwrap().to_hex();

    let blog = state.blogs.dislike(&id, user_id).await.unwrap();
    assert_eq!(blog.dislikes, vec![user_id]);
    assert!(blog.is_disliked);
    assert!(blog.likes.is_empty());

    let blog = state.blogs.like(&id, user_id).await.unwrap();
    assert_eq!(blog.likes, vec![user_id]);
    assert!(blog.is_liked);
    assert!(blog.dislikes.is_empty());
    assert!(!blog.is_disliked);
}

#[tokio::test]
async fn like_toggles_off() {
    let state = common::state();
    let user = common::register(&state, "a@x.com").await;
    let user_id = user.id.unwrap();
    let blog = blog(&state, "Hot Take").await;
    let id = blog.id.unwrap().to_hex();

    let blog = state.blogs.like(&id, user_id).await.unwrap();
    assert_eq!(blog.likes, vec![user_id]);

    let blog = state.blogs.like(&id, user_id).await.unwrap();
    assert!(blog.likes.is_empty());
    assert!(!blog.is_liked);
}

#[tokio::test]
async fn two_users_react_independently() {
    let state = common::state();
    let a = common::register(&state, "a@x.com").await.id.unwrap();
    let b = common::register(&state, "b@x.com").await.id.unwrap();
    let blog = blog(&state, "Hot Take").await;
    let id = blog.id.unwrap().to_hex();

    state.blogs.like(&id, a).await.unwrap();
    let blog = state.blogs.dislike(&id, b).await.unwrap();
    assert_eq!(blog.likes, vec![a]);
    assert_eq!(blog.dislikes, vec![b]);
}
