//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Post, PostChanges};
use quill_shared::dto::{PostRequest, PostResponse};

use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::{AppResult, required_value};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        text: post.text,
        pub_date: post.pub_date,
        author: post.author.username,
        image: post.image,
        group: post.group,
    }
}

/// GET /api/v1/posts
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts.into_iter().map(post_response).collect::<Vec<_>>()))
}

/// POST /api/v1/posts
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let text = required_value("text", req.text)?;

    let post = state
        .posts
        .create(
            identity.author(),
            text,
            req.image.flatten(),
            req.group.flatten(),
        )
        .await?;
    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/v1/posts/{id}
pub async fn retrieve(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .retrieve(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/v1/posts/{id}
///
/// Full replacement: a missing `image` or `group` is cleared. `text` is
/// checked only once the requester may edit the post.
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges::replace(req.text, req.image.flatten(), req.group.flatten());

    let post = state
        .posts
        .update(identity.user_id, path.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PATCH /api/v1/posts/{id}
pub async fn partial_update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges::partial(req.text, req.image, req.group);

    let post = state
        .posts
        .update(identity.user_id, path.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn destroy(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/v1/admin/posts/{id}
pub async fn admin_destroy(
    AdminIdentity(admin): AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete_as_admin(id).await?;
    tracing::debug!(admin = %admin.username, post_id = id, "Admin deleted post");
    Ok(HttpResponse::NoContent().finish())
}
