//! End-to-end tests of the HTTP surface over in-memory stores.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use cadence_core::domain::{Role, User};
use cadence_core::ports::{JobQueue, PasswordService, TokenService};
use cadence_core::publishing::PublishingConfig;
use cadence_core::services::SweepConfig;
use cadence_infra::{
    Argon2PasswordService, InMemoryJobQueue, InMemoryJobQueueConfig, JwtConfig, JwtTokenService,
    SimulatedTransportConfig, in_memory_repositories,
};

use super::configure_routes;
use crate::background::SchedulerConfig;
use crate::config::{AppConfig, JobQueueSettings};
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

const PASSWORD: &str = "correct horse battery";

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            expiration_hours: 1,
            issuer: "cadence-test".to_string(),
        },
        publishing: PublishingConfig {
            max_retries: 3,
            retry_delay: Duration::ZERO,
        },
        transport: SimulatedTransportConfig::reliable(),
        sweep_transport: SimulatedTransportConfig::reliable(),
        sweep: SweepConfig::default(),
        scheduler: SchedulerConfig::default(),
        jobs: JobQueueSettings::default(),
        #[cfg(feature = "rate-limit")]
        rate_limit: cadence_infra::RateLimitConfig::default(),
    }
}

fn test_state() -> AppState {
    AppState::assemble(in_memory_repositories(), None, None, &test_config())
}

fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(test_config().jwt))
}

macro_rules! test_app {
    ($state:expr) => {{
        let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state))
                .app_data(web::Data::new(token_service()))
                .app_data(web::Data::new(password_service))
                .configure(configure_routes),
        )
        .await
    }};
}

/// Send `req` and return the status and the JSON body (`Null` when empty).
/// Role guards reject with `Err`, which is rendered here like the server does.
async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = actix_web::body::to_bytes(res.into_body())
                .await
                .unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn get(uri: &str, token: &str) -> Request {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request()
}

fn post(uri: &str, token: &str, body: Value) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
        .to_request()
}

fn post_empty(uri: &str, token: &str) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request()
}

/// Register a tenant and return the owner's token and user object.
async fn register<S, B>(app: &S, email: &str) -> (String, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": email,
            "password": PASSWORD,
            "tenant_name": "Acme Coffee"
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    (token, body["data"]["user"].clone())
}

async fn create_brand<S, B>(app: &S, token: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        post(
            "/api/brands",
            token,
            json!({ "name": "Acme Roasters", "approver_contact": "+15550100" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_post<S, B>(app: &S, token: &str, brand_id: &str, platforms: &[&str]) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        post(
            "/api/posts",
            token,
            json!({
                "brand_id": brand_id,
                "title": "Autumn blend",
                "hook": "Our autumn blend is here",
                "body": "Notes of fig and cocoa.",
                "hashtags": ["#coffee"],
                "platforms": platforms,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "DRAFT");
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Token for a VIEWER added to the tenant of `owner`.
async fn viewer_token(state: &AppState, owner: &Value) -> String {
    let tenant_id: Uuid = owner["tenant_id"].as_str().unwrap().parse().unwrap();
    let viewer = state
        .repos
        .users
        .create(User::new(
            tenant_id,
            "viewer@acme.test".to_string(),
            "unused".to_string(),
            Role::Viewer,
        ))
        .await
        .unwrap();

    token_service()
        .generate_token(viewer.id, tenant_id, &viewer.email, vec!["VIEWER".to_string()])
        .unwrap()
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let app = test_app!(test_state());

    let (token, user) = register(&app, "Owner@Acme.test").await;
    assert_eq!(user["email"], "owner@acme.test");
    assert_eq!(user["role"], "OWNER");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "owner@acme.test", "password": PASSWORD, "tenant_name": "Again" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "owner@acme.test", "password": PASSWORD }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "owner@acme.test", "password": "wrong password" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user["id"]);
}

#[actix_web::test]
async fn test_register_rejects_invalid_input() {
    let app = test_app!(test_state());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "not-an-email", "password": "short", "tenant_name": " " }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app!(test_state());

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/brands")
        .set_json(json!({ "name": "Nope" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_draft_to_published_workflow() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;
    let brand_id = create_brand(&app, &token).await;
    let post_id = create_post(&app, &token, &brand_id, &["facebook", "INSTAGRAM"]).await;

    let (status, body) = send(&app, post_empty(&format!("/api/posts/{post_id}/submit"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PENDING_APPROVAL");

    let (status, body) = send(
        &app,
        post(&format!("/api/posts/{post_id}/approve"), &token, json!({ "feedback": "Ship it" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "APPROVED");

    let (status, body) = send(&app, post_empty(&format!("/api/publish/dispatch/{post_id}"), &token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Published to 1/2 platforms");
    assert_eq!(body["data"]["total_platforms"], 2);
    assert_eq!(body["data"]["successful_platforms"], 1);
    assert_eq!(body["data"]["failed_platforms"], 1);
    let instagram = body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["platform"] == "INSTAGRAM")
        .unwrap();
    assert_eq!(instagram["success"], false);
    assert!(
        instagram["error"]
            .as_str()
            .unwrap()
            .contains("Instagram requires at least one image")
    );

    let (status, body) = send(&app, get(&format!("/api/publish/status/{post_id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["post"]["status"], "PUBLISHED");
    let analytics = body["data"]["analytics"].as_array().unwrap();
    assert_eq!(analytics.len(), 1);
    assert_eq!(analytics[0]["platform"], "FACEBOOK");

    let (status, body) = send(&app, get(&format!("/api/posts/{post_id}/approvals"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/api/posts?status=published", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_viewer_can_read_but_not_write() {
    let state = test_state();
    let app = test_app!(state.clone());
    let (_, owner) = register(&app, "owner@acme.test").await;
    let token = viewer_token(&state, &owner).await;

    let (status, _) = send(&app, get("/api/brands", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post("/api/brands", &token, json!({ "name": "Side" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);

    let (status, _) = send(&app, post_empty("/api/scheduling/trigger", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_illegal_transition_is_conflict() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;
    let brand_id = create_brand(&app, &token).await;
    let post_id = create_post(&app, &token, &brand_id, &["X"]).await;

    let (status, body) = send(&app, post_empty(&format!("/api/posts/{post_id}/approve"), &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Post cannot move from DRAFT to APPROVED");

    let (status, _) = send(
        &app,
        post(&format!("/api/posts/{post_id}/request-changes"), &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post(
            &format!("/api/posts/{post_id}/request-changes"),
            &token,
            json!({ "feedback": "Tighten the hook" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_other_tenants_posts_are_not_found() {
    let app = test_app!(test_state());
    let (owner, _) = register(&app, "owner@acme.test").await;
    let (stranger, _) = register(&app, "owner@globex.test").await;
    let brand_id = create_brand(&app, &owner).await;
    let post_id = create_post(&app, &owner, &brand_id, &["LINKEDIN"]).await;

    let (status, _) = send(&app, get(&format!("/api/posts/{post_id}"), &stranger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, post_empty(&format!("/api/publish/dispatch/{post_id}"), &stranger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get(&format!("/api/posts/{}", Uuid::new_v4()), &owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_post_validates_platforms() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;
    let brand_id = create_brand(&app, &token).await;

    let (status, body) = send(
        &app,
        post(
            "/api/posts",
            &token,
            json!({ "brand_id": brand_id, "title": "", "platforms": ["myspace"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("title is required"));

    let (status, _) = send(
        &app,
        post(
            "/api/posts",
            &token,
            json!({ "brand_id": Uuid::new_v4(), "title": "Orphan", "platforms": ["X"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_schedule_and_cancel() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;
    let brand_id = create_brand(&app, &token).await;
    let post_id = create_post(&app, &token, &brand_id, &["TIKTOK"]).await;
    send(&app, post_empty(&format!("/api/posts/{post_id}/submit"), &token)).await;
    send(&app, post_empty(&format!("/api/posts/{post_id}/approve"), &token)).await;

    let run_at = Utc::now() + TimeDelta::hours(2);
    let (status, body) = send(
        &app,
        post(
            &format!("/api/posts/{post_id}/schedule"),
            &token,
            json!({ "run_at": run_at, "timezone": "Europe/Lisbon" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "PENDING");

    let (_, body) = send(&app, get(&format!("/api/posts/{post_id}"), &token)).await;
    assert_eq!(body["data"]["status"], "SCHEDULED");

    let (status, body) = send(&app, get("/api/scheduling/status", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["scheduled"], 1);
    assert_eq!(body["data"]["pending_schedules"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}/schedule"))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CANCELLED");

    let past = Utc::now() - TimeDelta::minutes(5);
    let (status, _) = send(
        &app,
        post(&format!("/api/posts/{post_id}/schedule"), &token, json!({ "run_at": past })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_manual_sweep_trigger() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;

    let (status, body) = send(&app, post_empty("/api/scheduling/trigger", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sweep completed");
    assert_eq!(body["data"]["published"], 0);
    assert_eq!(body["data"]["auto_approved"], 0);
}

#[actix_web::test]
async fn test_analytics_pull_runs_inline_without_queue() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;
    let brand_id = create_brand(&app, &token).await;
    let post_id = create_post(&app, &token, &brand_id, &["FACEBOOK", "X"]).await;
    send(&app, post_empty(&format!("/api/posts/{post_id}/submit"), &token)).await;
    send(&app, post_empty(&format!("/api/posts/{post_id}/approve"), &token)).await;
    send(&app, post_empty(&format!("/api/publish/dispatch/{post_id}"), &token)).await;

    let uri = format!("/api/analytics/brand/{brand_id}/pull");
    let (status, body) = send(&app, post_empty(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["queued"], false);
    assert_eq!(body["data"]["records_created"], 2);

    let uri = format!("/api/analytics/brand/{}/pull", Uuid::new_v4());
    let (status, _) = send(&app, post_empty(&uri, &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_analytics_pull_is_queued_when_queue_exists() {
    let queue = Arc::new(InMemoryJobQueue::new(InMemoryJobQueueConfig::default()));
    let jobs: Arc<dyn JobQueue> = queue.clone();
    let state = AppState::assemble(in_memory_repositories(), None, Some(jobs), &test_config());
    let app = test_app!(state);
    let (token, _) = register(&app, "owner@acme.test").await;
    let brand_id = create_brand(&app, &token).await;

    let uri = format!("/api/analytics/brand/{brand_id}/pull");
    let (status, body) = send(&app, post_empty(&uri, &token)).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["queued"], true);
    assert!(body["data"]["job_id"].is_string());
    assert_eq!(queue.stats().await.unwrap().pending, 1);
}

#[actix_web::test]
async fn test_publisher_diagnostics() {
    let app = test_app!(test_state());
    let (token, _) = register(&app, "owner@acme.test").await;

    let (status, body) = send(&app, get("/api/publish/publishers", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["supported"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["publishers"][0]["configured"], true);

    let (status, body) = send(&app, get("/api/publish/health", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["healthy"], true);
    assert_eq!(body["data"]["configured"], 5);
}

#[actix_web::test]
async fn test_health_reports_backends() {
    let app = test_app!(test_state());

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "probe-1"))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "in-memory");
    assert_eq!(body["job_queue"], "inline");
    assert_eq!(body["request_id"], "probe-1");
}
