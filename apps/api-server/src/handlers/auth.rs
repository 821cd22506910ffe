//! Authentication handlers.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use cadence_core::domain::{Role, Tenant, User};
use cadence_core::ports::{PasswordService, TokenService};
use cadence_shared::ApiResponse;
use cadence_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        tenant_id: user.tenant_id,
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        created_at: user.created_at,
    }
}

fn issue_token(token_service: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let token = token_service
        .generate_token(
            user.id,
            user.tenant_id,
            &user.email,
            vec![user.role.as_str().to_string()],
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
        user: user_response(user),
    })
}

/// POST /api/auth/register
///
/// Creates a tenant and its OWNER.
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();
    let tenant_name = req.tenant_name.trim();

    let mut errors = Vec::new();
    if email.is_empty() || !email.contains('@') {
        errors.push("Invalid email address".to_string());
    }
    if req.password.len() < 8 {
        errors.push("Password must be at least 8 characters".to_string());
    }
    if tenant_name.is_empty() {
        errors.push("Tenant name is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if state.repos.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let tenant = state
        .repos
        .tenants
        .create(Tenant::new(tenant_name.to_string()))
        .await?;
    let user = state
        .repos
        .users
        .create(User::new(tenant.id, email, password_hash, Role::Owner))
        .await?;

    tracing::info!(user_id = %user.id, tenant_id = %tenant.id, "Tenant registered");

    let auth = issue_token(token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(auth)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    let user = state
        .repos
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    let auth = issue_token(token_service.get_ref().as_ref(), &user)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth)))
}

/// GET /api/auth/me
pub async fn me(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = state
        .repos
        .users
        .find_by_id(identity.user_id)
        .await?
        .filter(|u| u.tenant_id == identity.tenant_id)
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(&user))))
}
