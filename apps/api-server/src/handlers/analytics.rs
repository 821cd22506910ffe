//! Analytics handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cadence_core::services::AnalyticsPullRequest;
use cadence_shared::ApiResponse;
use cadence_shared::dto::AnalyticsPullResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/analytics/brand/{brand_id}/pull
///
/// Queued when a job queue is available (202), run inline otherwise (200).
pub async fn pull(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let brand_id = path.into_inner();

    let Some(queue) = state.jobs.as_ref() else {
        let report = state
            .analytics
            .pull_brand_analytics(identity.tenant_id, brand_id)
            .await?;
        return Ok(HttpResponse::Ok().json(ApiResponse::ok(AnalyticsPullResponse {
            brand_id,
            queued: false,
            job_id: None,
            records_created: Some(report.records_created),
        })));
    };

    state
        .repos
        .brands
        .find_for_tenant(brand_id, identity.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Brand with id {} not found", brand_id)))?;

    let job = AnalyticsPullRequest {
        tenant_id: identity.tenant_id,
        brand_id,
    }
    .into_job();
    let job_id = job.id.clone();

    queue
        .enqueue(job)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(brand_id = %brand_id, job_id = %job_id, "Analytics pull queued");
    Ok(HttpResponse::Accepted().json(ApiResponse::ok_with_message(
        AnalyticsPullResponse {
            brand_id,
            queued: true,
            job_id: Some(job_id),
            records_created: None,
        },
        "Analytics pull queued",
    )))
}
