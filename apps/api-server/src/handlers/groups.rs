//! Group handlers. Reads are open to any identity; writes are admin-only.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Group, NewGroup};
use quill_shared::dto::{CreateGroupRequest, GroupResponse};

use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn group_response(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

/// GET /api/v1/groups
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;
    Ok(HttpResponse::Ok().json(groups.into_iter().map(group_response).collect::<Vec<_>>()))
}

/// GET /api/v1/groups/{id}
pub async fn retrieve(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let group = state.groups.retrieve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group_response(group)))
}

/// POST /api/v1/admin/groups
pub async fn create(
    AdminIdentity(admin): AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CreateGroupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let group = state
        .groups
        .create(NewGroup {
            title: req.title,
            slug: req.slug,
            description: req.description,
        })
        .await?;
    tracing::debug!(admin = %admin.username, group_id = group.id, "Admin created group");
    Ok(HttpResponse::Created().json(group_response(group)))
}

/// DELETE /api/v1/admin/groups/{id}
///
/// Posts in the group survive with their group cleared.
pub async fn destroy(
    AdminIdentity(admin): AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.groups.delete(id).await?;
    tracing::debug!(admin = %admin.username, group_id = id, "Admin deleted group");
    Ok(HttpResponse::NoContent().finish())
}
