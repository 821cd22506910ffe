//! Post handlers: authoring, the approval workflow and scheduling.

use std::str::FromStr;

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use cadence_core::domain::{MediaAsset, MediaKind, Platform, Post, PostContent, PostStatus};
use cadence_shared::ApiResponse;
use cadence_shared::dto::{
    ApprovalFeedbackRequest, CreatePostRequest, ListPostsQuery, SchedulePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_media_kind(kind: &str) -> Result<MediaKind, String> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "image" => Ok(MediaKind::Image),
        "video" => Ok(MediaKind::Video),
        other => Err(format!("unknown media kind: {other}")),
    }
}

/// Turn the request into post content, collecting every problem at once.
fn build_content(req: CreatePostRequest) -> Result<(Uuid, String, PostContent), Vec<String>> {
    let mut errors = Vec::new();

    let title = req.title.trim().to_string();
    if title.is_empty() {
        errors.push("title is required".to_string());
    }

    let mut platforms = Vec::with_capacity(req.platforms.len());
    for raw in &req.platforms {
        match Platform::from_str(raw) {
            Ok(platform) => platforms.push(platform),
            Err(e) => errors.push(e),
        }
    }

    let mut media = Vec::with_capacity(req.media.len());
    for asset in req.media {
        match parse_media_kind(&asset.kind) {
            Ok(kind) if !asset.url.trim().is_empty() => media.push(MediaAsset {
                url: asset.url,
                kind,
            }),
            Ok(_) => errors.push("media url is required".to_string()),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let hashtags = req
        .hashtags
        .into_iter()
        .map(|tag| tag.trim().trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    Ok((
        req.brand_id,
        title,
        PostContent {
            hook: req.hook,
            body: req.body,
            hashtags,
            platforms,
            media,
        },
    ))
}

/// POST /api/posts
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let (brand_id, title, content) =
        build_content(body.into_inner()).map_err(AppError::Validation)?;

    state
        .repos
        .brands
        .find_for_tenant(brand_id, identity.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Brand with id {} not found", brand_id)))?;

    let post = state
        .repos
        .posts
        .create(Post::new(identity.tenant_id, brand_id, title, content))
        .await?;

    tracing::info!(post_id = %post.id, brand_id = %brand_id, "Post drafted");
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/posts?status=
pub async fn list(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .map(PostStatus::from_str)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let posts = state
        .repos
        .posts
        .list_for_tenant(identity.tenant_id, status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{id}
pub async fn get(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .repos
        .posts
        .find_for_tenant(post_id, identity.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", post_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts/{id}/submit
pub async fn submit(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .approvals
        .submit(path.into_inner(), identity.tenant_id, identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Submitted for approval")))
}

/// POST /api/posts/{id}/approve
pub async fn approve(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ApprovalFeedbackRequest>>,
) -> AppResult<HttpResponse> {
    let feedback = body.and_then(|b| b.into_inner().feedback);
    let post = state
        .approvals
        .approve(path.into_inner(), identity.tenant_id, identity.user_id, feedback)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts/{id}/reject
pub async fn reject(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ApprovalFeedbackRequest>>,
) -> AppResult<HttpResponse> {
    let feedback = body.and_then(|b| b.into_inner().feedback);
    let post = state
        .approvals
        .reject(path.into_inner(), identity.tenant_id, identity.user_id, feedback)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts/{id}/request-changes
pub async fn request_changes(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ApprovalFeedbackRequest>,
) -> AppResult<HttpResponse> {
    let feedback = body.into_inner().feedback.unwrap_or_default();
    let post = state
        .approvals
        .request_changes(path.into_inner(), identity.tenant_id, identity.user_id, feedback)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts/{id}/reopen
pub async fn reopen(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .approvals
        .reopen(path.into_inner(), identity.tenant_id, identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts/{id}/archive
pub async fn archive(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .approvals
        .archive(path.into_inner(), identity.tenant_id, identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/posts/{id}/approvals
pub async fn approvals(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let history = state
        .approvals
        .history(path.into_inner(), identity.tenant_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(history)))
}

/// POST /api/posts/{id}/schedule
pub async fn schedule(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SchedulePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let schedule = state
        .scheduling
        .schedule_post(
            path.into_inner(),
            identity.tenant_id,
            req.run_at,
            req.timezone,
            Utc::now(),
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(schedule)))
}

/// DELETE /api/posts/{id}/schedule
pub async fn cancel_schedule(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let schedule = state
        .scheduling
        .cancel_schedule(path.into_inner(), identity.tenant_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(schedule, "Schedule cancelled")))
}
