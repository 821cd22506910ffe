//! Publishing handlers: manual dispatch and publisher diagnostics.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cadence_core::publishing::PublisherStatus;
use cadence_shared::ApiResponse;
use cadence_shared::dto::{PublishHealthResponse, PublisherInfo, PublishersResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/publish/dispatch/{post_id}
///
/// Publishes immediately to every platform of the post. `success` is true
/// when at least one platform accepted it.
pub async fn dispatch(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let result = state
        .publishing
        .dispatch_post(path.into_inner(), identity.tenant_id)
        .await?;

    let message = format!(
        "Published to {}/{} platforms",
        result.successful_platforms, result.total_platforms
    );
    Ok(HttpResponse::Ok().json(ApiResponse {
        success: result.success,
        data: Some(result),
        message: Some(message),
    }))
}

/// GET /api/publish/status/{post_id}
pub async fn status(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let status = state
        .publishing
        .publish_status(path.into_inner(), identity.tenant_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(status)))
}

fn publisher_info(status: &PublisherStatus) -> PublisherInfo {
    PublisherInfo {
        platform: status.platform.as_str().to_string(),
        display_name: status.platform.display_name().to_string(),
        configured: status.configured,
    }
}

/// GET /api/publish/publishers
pub async fn publishers(_identity: Identity, state: web::Data<AppState>) -> HttpResponse {
    let factory = state.publishing.publishers();
    let response = PublishersResponse {
        supported: factory
            .supported_platforms()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect(),
        publishers: factory
            .configured_publishers()
            .iter()
            .map(publisher_info)
            .collect(),
    };
    HttpResponse::Ok().json(ApiResponse::ok(response))
}

/// GET /api/publish/health
pub async fn health(_identity: Identity, state: web::Data<AppState>) -> HttpResponse {
    let statuses = state.publishing.publishers().configured_publishers();
    let unconfigured: Vec<String> = statuses
        .iter()
        .filter(|s| !s.configured)
        .map(|s| s.platform.as_str().to_string())
        .collect();

    let response = PublishHealthResponse {
        healthy: unconfigured.is_empty(),
        total: statuses.len(),
        configured: statuses.len() - unconfigured.len(),
        unconfigured,
    };
    HttpResponse::Ok().json(ApiResponse::ok(response))
}
