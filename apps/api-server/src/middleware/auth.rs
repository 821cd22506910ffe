//! Authentication extractor and role guard.

use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, http::header, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use cadence_core::domain::Role;
use cadence_core::ports::{AuthError, TokenClaims, TokenService};
use cadence_shared::ErrorResponse;

/// Authenticated caller: who they are, which tenant they act for and with
/// which roles.
///
/// ```ignore
/// async fn list_brands(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
///     let brands = state.repos.brands.list_for_tenant(identity.tenant_id).await?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role.as_str()))
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            tenant_id: claims.tenant_id,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::InvalidCredentials => ErrorResponse::unauthorized(),
            AuthError::InsufficientPermissions => ErrorResponse::forbidden()
                .with_detail("Your role does not allow this action."),
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// Resolve the caller of `req`, reusing an identity a guard already stored.
fn authenticate(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    if let Some(identity) = req.extensions().get::<Identity>() {
        return Ok(identity.clone());
    }

    let Some(token_service) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return Err(AuthenticationError(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        )));
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthenticationError(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError(AuthError::InvalidToken(
            "Expected Bearer token".to_string(),
        ))
    })?;

    token_service
        .validate_token(token)
        .map(Identity::from)
        .map_err(AuthenticationError)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Guard that lets a request through only when the caller holds one of the
/// listed roles. Wrap it around a resource or scope:
///
/// ```ignore
/// web::resource("/dispatch/{post_id}")
///     .wrap(RequireRole::any_of(&[Role::Owner, Role::Admin]))
///     .route(web::post().to(publish::dispatch))
/// ```
#[derive(Clone)]
pub struct RequireRole {
    roles: Rc<[Role]>,
}

impl RequireRole {
    pub fn any_of(roles: &[Role]) -> Self {
        Self {
            roles: Rc::from(roles),
        }
    }

    /// OWNER or ADMIN.
    pub fn managers() -> Self {
        Self::any_of(&[Role::Owner, Role::Admin])
    }

    /// Anyone allowed to author content.
    pub fn editors() -> Self {
        Self::any_of(&[Role::Owner, Role::Admin, Role::Editor])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            roles: self.roles.clone(),
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    roles: Rc<[Role]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = match authenticate(req.request()) {
            Ok(identity) => identity,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        if !identity.has_any_role(&self.roles) {
            tracing::warn!(
                user_id = %identity.user_id,
                email = %identity.email,
                path = %req.path(),
                "Request rejected: missing role"
            );
            return Box::pin(async move {
                Err(AuthenticationError(AuthError::InsufficientPermissions).into())
            });
        }

        req.extensions_mut().insert(identity);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
