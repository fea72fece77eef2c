//! Comment handlers, nested under `/posts/{post_id}`.

use actix_web::{HttpResponse, web};

use quill_core::domain::Comment;
use quill_shared::dto::{CommentRequest, CommentResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, required_value};
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        author: comment.author.username,
        post: comment.post,
        text: comment.text,
        created: comment.created,
    }
}

/// GET /api/v1/posts/{post_id}/comments
pub async fn list(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(
        comments
            .into_iter()
            .map(comment_response)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/v1/posts/{post_id}/comments
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let text = required_value("text", body.into_inner().text)?;
    let comment = state
        .comments
        .create(identity.author(), path.into_inner(), text)
        .await?;
    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// GET /api/v1/posts/{post_id}/comments/{id}
pub async fn retrieve(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, id) = path.into_inner();
    let comment = state
        .comments
        .retrieve(identity.user_id, post_id, id)
        .await?;
    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// PUT /api/v1/posts/{post_id}/comments/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, id) = path.into_inner();
    let comment = state
        .comments
        .replace(identity.user_id, post_id, id, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// PATCH /api/v1/posts/{post_id}/comments/{id}
pub async fn partial_update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, id) = path.into_inner();
    let comment = state
        .comments
        .update(identity.user_id, post_id, id, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// DELETE /api/v1/posts/{post_id}/comments/{id}
pub async fn destroy(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, id) = path.into_inner();
    state.comments.delete(identity.user_id, post_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
