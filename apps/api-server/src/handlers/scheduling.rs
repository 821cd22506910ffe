//! Scheduling handlers: manual sweep trigger and workflow counters.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use cadence_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/scheduling/trigger
///
/// Runs both sweeps right away, limited to the caller's tenant.
pub async fn trigger(identity: Identity, state: web::Data<AppState>) -> HttpResponse {
    let report = state
        .scheduling
        .run_sweeps(Utc::now(), Some(identity.tenant_id))
        .await;

    tracing::info!(
        tenant_id = %identity.tenant_id,
        published = report.published,
        failed = report.failed,
        auto_approved = report.auto_approved,
        "Manual sweep finished"
    );
    HttpResponse::Ok().json(ApiResponse::ok_with_message(report, "Sweep completed"))
}

/// GET /api/scheduling/status
pub async fn status(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let status = state.scheduling.status(identity.tenant_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(status)))
}
