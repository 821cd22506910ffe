//! Brand handlers.

use actix_web::{HttpResponse, web};

use cadence_core::domain::Brand;
use cadence_shared::ApiResponse;
use cadence_shared::dto::CreateBrandRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/brands
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreateBrandRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Brand name is required".to_string()));
    }

    let brand = state
        .repos
        .brands
        .create(Brand::new(
            identity.tenant_id,
            name.to_string(),
            non_blank(req.voice),
            non_blank(req.approver_contact),
        ))
        .await?;

    tracing::info!(brand_id = %brand.id, tenant_id = %brand.tenant_id, "Brand created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(brand)))
}

/// GET /api/brands
pub async fn list(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let brands = state.repos.brands.list_for_tenant(identity.tenant_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(brands)))
}
