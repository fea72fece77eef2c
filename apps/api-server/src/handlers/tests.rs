//! End-to-end tests of the HTTP surface over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use quill_core::domain::{Group, NewGroup, Post, User};
use quill_infra::{InMemoryRateLimiter, JwtConfig, JwtTokenService, RateLimitConfig};

use super::configure_app;
use crate::state::{AppState, Repositories, Storage};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(App::new().configure(configure_app($state.clone()))).await
    };
}

fn test_state() -> AppState {
    AppState::from_parts(
        Repositories::in_memory(),
        Storage::Memory,
        Arc::new(JwtTokenService::new(JwtConfig::default())),
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        })),
    )
}

async fn seed_user(state: &AppState, username: &str) -> (User, String) {
    let hash = state.passwords.hash("password123").unwrap();
    let user = state
        .users
        .save(User::new(username.to_string(), hash))
        .await
        .unwrap();
    (user.clone(), bearer(state, &user))
}

async fn seed_admin(state: &AppState) -> String {
    let (user, _) = seed_user(state, "root").await;
    let admin = state.users.save(user.into_staff()).await.unwrap();
    bearer(state, &admin)
}

fn bearer(state: &AppState, user: &User) -> String {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.roles())
        .unwrap();
    format!("Bearer {token}")
}

async fn seed_group(state: &AppState, slug: &str) -> Group {
    state
        .groups
        .create(NewGroup {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: String::new(),
        })
        .await
        .unwrap()
}

async fn seed_post(state: &AppState, author: &User, group: Option<i32>) -> Post {
    state
        .posts
        .create(author.as_author(), "original".into(), None, group)
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_anonymous_post_list_is_unauthorized() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_garbage_token_is_unauthorized() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/groups")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_post_ignores_body_author() {
    let state = test_state();
    seed_user(&state, "mallory").await;
    let (bob, token) = seed_user(&state, "bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": "hello", "author": "mallory", "pub_date": "2000-01-01T00:00:00Z" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["author"], "bob");
    assert_ne!(body["pub_date"], "2000-01-01T00:00:00Z");

    let stored = state.posts.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].author.id, bob.id);
}

#[actix_web::test]
async fn test_create_post_requires_text() {
    let state = test_state();
    let (_, token) = seed_user(&state, "bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", token))
        .set_json(json!({ "image": "posts/a.png" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["field"], "text");
}

#[actix_web::test]
async fn test_create_post_with_unknown_group_names_field() {
    let state = test_state();
    let (_, token) = seed_user(&state, "bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": "hello", "group": 42 }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["field"], "group");
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let state = test_state();
    let (_, token) = seed_user(&state, "bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"text\": ")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_non_numeric_id_is_not_found() {
    let state = test_state();
    let (_, token) = seed_user(&state, "bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/abc")
        .insert_header(("Authorization", token))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_any_identity_can_read_foreign_post() {
    let state = test_state();
    let (alice, _) = seed_user(&state, "alice").await;
    let (_, bob_token) = seed_user(&state, "bob").await;
    let post = seed_post(&state, &alice, None).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", bob_token))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["author"], "alice");
    assert_eq!(body["text"], "original");
}

#[actix_web::test]
async fn test_patch_by_non_author_is_forbidden_and_leaves_text() {
    let state = test_state();
    let (alice, _) = seed_user(&state, "alice").await;
    let (_, bob_token) = seed_user(&state, "bob").await;
    let post = seed_post(&state, &alice, None).await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", bob_token))
        .set_json(json!({ "text": "defaced" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let stored = state.posts.retrieve(alice.id, post.id).await.unwrap();
    assert_eq!(stored.text, "original");
}

#[actix_web::test]
async fn test_write_to_missing_post_is_not_found_not_forbidden() {
    let state = test_state();
    let (_, token) = seed_user(&state, "bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri("/api/v1/posts/999")
        .insert_header(("Authorization", token))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_patch_null_group_clears_it_and_keeps_text() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let group = seed_group(&state, "cats").await;
    let post = seed_post(&state, &alice, Some(group.id)).await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", token))
        .set_json(json!({ "group": null }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["group"], Value::Null);
    assert_eq!(body["text"], "original");
}

#[actix_web::test]
async fn test_put_replaces_and_clears_absent_fields() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let group = seed_group(&state, "cats").await;
    let post = state
        .posts
        .create(
            alice.as_author(),
            "original".into(),
            Some("posts/cat.png".into()),
            Some(group.id),
        )
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": "rewritten" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["text"], "rewritten");
    assert_eq!(body["image"], Value::Null);
    assert_eq!(body["group"], Value::Null);
    assert_eq!(body["pub_date"], json!(post.pub_date));
}

#[actix_web::test]
async fn test_empty_put_checks_access_before_text() {
    let state = test_state();
    let (alice, alice_token) = seed_user(&state, "alice").await;
    let (_, bob_token) = seed_user(&state, "bob").await;
    let post = seed_post(&state, &alice, None).await;
    let app = init_app!(state);

    let foreign = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", bob_token.clone()))
        .set_json(json!({}))
        .to_request();
    assert_eq!(
        test::call_service(&app, foreign).await.status(),
        StatusCode::FORBIDDEN
    );

    let missing = test::TestRequest::put()
        .uri("/api/v1/posts/999")
        .insert_header(("Authorization", bob_token))
        .set_json(json!({}))
        .to_request();
    assert_eq!(
        test::call_service(&app, missing).await.status(),
        StatusCode::NOT_FOUND
    );

    let own = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", alice_token))
        .set_json(json!({}))
        .to_request();
    let res = test::call_service(&app, own).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["field"], "text");
}

#[actix_web::test]
async fn test_patch_null_text_is_rejected() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let post = seed_post(&state, &alice, None).await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": null }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["field"], "text");
    assert_eq!(body["detail"], "This field may not be null.");
    let stored = state.posts.retrieve(alice.id, post.id).await.unwrap();
    assert_eq!(stored.text, "original");
}

#[actix_web::test]
async fn test_anonymous_writes_are_unauthorized_and_change_nothing() {
    let state = test_state();
    let (alice, _) = seed_user(&state, "alice").await;
    let post = seed_post(&state, &alice, None).await;
    let comment = state
        .comments
        .create(alice.as_author(), post.id, "mine".into())
        .await
        .unwrap();
    let app = init_app!(state);

    let create = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(json!({ "text": "anon" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, create).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let patch = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .set_json(json!({ "text": "defaced" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, patch).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, delete).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let posts = state.posts.list().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "original");
    let comments = state.comments.list(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "mine");
}

#[actix_web::test]
async fn test_token_for_unknown_user_cannot_write() {
    let state = test_state();
    let (alice, _) = seed_user(&state, "alice").await;
    let post = seed_post(&state, &alice, None).await;
    let ghost = User::new("ghost".into(), "hash".into());
    let token = bearer(&state, &ghost);
    let app = init_app!(state);

    let create = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", token.clone()))
        .set_json(json!({ "text": "boo" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, create).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let comment = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", post.id))
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": "boo" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, comment).await.status(),
        StatusCode::UNAUTHORIZED
    );

    assert_eq!(state.posts.list().await.unwrap().len(), 1);
    assert!(state.comments.list(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_comment_post_comes_from_path() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let target = seed_post(&state, &alice, None).await;
    let other = seed_post(&state, &alice, None).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", target.id))
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": "nice", "post": other.id, "author": "mallory" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["post"], target.id);
    assert_eq!(body["author"], "alice");
    assert!(state.comments.list(other.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_comments_of_missing_post_are_not_found() {
    let state = test_state();
    let (_, token) = seed_user(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/999/comments")
        .insert_header(("Authorization", token.clone()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/999/comments")
        .insert_header(("Authorization", token))
        .set_json(json!({ "text": "into the void" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_under_wrong_post_is_not_found() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let one = seed_post(&state, &alice, None).await;
    let two = seed_post(&state, &alice, None).await;
    let comment = state
        .comments
        .create(alice.as_author(), one.id, "on one".into())
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments/{}", two.id, comment.id))
        .insert_header(("Authorization", token))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_deleted_own_comment_leaves_list() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let post = seed_post(&state, &alice, None).await;
    let keep = state
        .comments
        .create(alice.as_author(), post.id, "keep".into())
        .await
        .unwrap();
    let gone = state
        .comments
        .create(alice.as_author(), post.id, "gone".into())
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, gone.id))
        .insert_header(("Authorization", token.clone()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments", post.id))
        .insert_header(("Authorization", token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(keep.id)]);
}

#[actix_web::test]
async fn test_comment_edit_by_non_author_is_forbidden() {
    let state = test_state();
    let (alice, _) = seed_user(&state, "alice").await;
    let (_, bob_token) = seed_user(&state, "bob").await;
    let post = seed_post(&state, &alice, None).await;
    let comment = state
        .comments
        .create(alice.as_author(), post.id, "mine".into())
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment.id))
        .insert_header(("Authorization", bob_token))
        .set_json(json!({ "text": "yours now" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let stored = state
        .comments
        .retrieve(alice.id, post.id, comment.id)
        .await
        .unwrap();
    assert_eq!(stored.text, "mine");
}

#[actix_web::test]
async fn test_empty_comment_put_checks_access_before_text() {
    let state = test_state();
    let (alice, alice_token) = seed_user(&state, "alice").await;
    let (_, bob_token) = seed_user(&state, "bob").await;
    let post = seed_post(&state, &alice, None).await;
    let comment = state
        .comments
        .create(alice.as_author(), post.id, "mine".into())
        .await
        .unwrap();
    let app = init_app!(state);

    let foreign = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment.id))
        .insert_header(("Authorization", bob_token.clone()))
        .set_json(json!({}))
        .to_request();
    assert_eq!(
        test::call_service(&app, foreign).await.status(),
        StatusCode::FORBIDDEN
    );

    let missing = test::TestRequest::put()
        .uri("/api/v1/posts/999/comments/1")
        .insert_header(("Authorization", bob_token))
        .set_json(json!({}))
        .to_request();
    assert_eq!(
        test::call_service(&app, missing).await.status(),
        StatusCode::NOT_FOUND
    );

    let own = test::TestRequest::put()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment.id))
        .insert_header(("Authorization", alice_token))
        .set_json(json!({}))
        .to_request();
    let res = test::call_service(&app, own).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["field"], "text");

    let stored = state
        .comments
        .retrieve(alice.id, post.id, comment.id)
        .await
        .unwrap();
    assert_eq!(stored.text, "mine");
}

#[actix_web::test]
async fn test_post_delete_takes_comments_with_it() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let post = seed_post(&state, &alice, None).await;
    let comment = state
        .comments
        .create(alice.as_author(), post.id, "first".into())
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", token.clone()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment.id))
        .insert_header(("Authorization", token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(state.comments.list(post.id).await.is_err());
}

#[actix_web::test]
async fn test_admin_group_delete_keeps_posts_ungrouped() {
    let state = test_state();
    let admin_token = seed_admin(&state).await;
    let (alice, token) = seed_user(&state, "alice").await;
    let group = seed_group(&state, "cats").await;
    let post = seed_post(&state, &alice, Some(group.id)).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/groups/{}", group.id))
        .insert_header(("Authorization", admin_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(("Authorization", token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["group"], Value::Null);
}

#[actix_web::test]
async fn test_admin_routes_reject_regular_users() {
    let state = test_state();
    let (alice, token) = seed_user(&state, "alice").await;
    let group = seed_group(&state, "cats").await;
    let post = seed_post(&state, &alice, None).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/groups/{}", group.id))
        .insert_header(("Authorization", token.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // Owning the post does not grant the admin override.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/posts/{}", post.id))
        .insert_header(("Authorization", token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
    assert!(state.groups.retrieve(group.id).await.is_ok());
}

#[actix_web::test]
async fn test_admin_group_create_and_duplicate_slug() {
    let state = test_state();
    let admin_token = seed_admin(&state).await;
    let app = init_app!(state);

    let payload = json!({ "title": "Cats", "slug": "cats", "description": "All about cats" });
    let req = test::TestRequest::post()
        .uri("/api/v1/admin/groups")
        .insert_header(("Authorization", admin_token.clone()))
        .set_json(&payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["slug"], "cats");

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/groups")
        .insert_header(("Authorization", admin_token))
        .set_json(&payload)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_register_then_obtain_token_then_me() {
    let state = test_state();
    let app = init_app!(state);

    let credentials = json!({ "username": "carol", "password": "correct horse" });
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&credentials)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/api-token-auth")
        .set_json(&credentials)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["token_type"], "Bearer");
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["username"], "carol");
    assert_eq!(body["roles"], json!(["user"]));
}

#[actix_web::test]
async fn test_register_rejects_short_password_and_duplicates() {
    let state = test_state();
    seed_user(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": "dave", "password": "short" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["field"], "password");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": "alice", "password": "long enough" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_wrong_password_is_unauthorized() {
    let state = test_state();
    seed_user(&state, "alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/api-token-auth")
        .set_json(json!({ "username": "alice", "password": "wrong password" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_token_endpoint_is_rate_limited() {
    let state = test_state();
    let app = init_app!(state);

    let attempt = || {
        test::TestRequest::post()
            .uri("/api/v1/api-token-auth")
            .set_json(json!({ "username": "nobody", "password": "whatever1" }))
            .to_request()
    };

    for _ in 0..2 {
        let res = test::call_service(&app, attempt()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    let res = test::call_service(&app, attempt()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("retry-after"));
}

#[actix_web::test]
async fn test_ensure_admin_promotes_existing_user() {
    let state = test_state();
    let (alice, _) = seed_user(&state, "alice").await;

    let admin = state
        .ensure_admin(&crate::config::AdminAccount {
            username: "alice".into(),
            password: "ignored password".into(),
        })
        .await
        .unwrap();

    assert_eq!(admin.id, alice.id);
    assert!(admin.is_staff);
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
