//! # Cadence API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use cadence_core::ports::{PasswordService, TokenService};
use cadence_infra::{Argon2PasswordService, JwtTokenService};

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[cfg(feature = "rate-limit")]
use cadence_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use middleware::rate_limit::RateLimitMiddleware;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry);

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting Cadence API Server"
    );

    let state = AppState::new(&config).await;

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    if let Some(queue) = state.jobs.as_ref() {
        if let Err(e) = background::start_job_worker(queue.as_ref(), state.analytics.clone()).await {
            tracing::error!(error = %e, "Failed to start job worker");
        }
    }

    #[cfg(feature = "scheduler")]
    let mut scheduler =
        match background::start_sweep_schedule(config.scheduler.clone(), state.scheduling.clone())
            .await
        {
            Ok(scheduler) => scheduler,
            Err(e) => {
                tracing::error!(error = %e, "Failed to start sweep scheduler");
                None
            }
        };

    #[cfg(feature = "rate-limit")]
    let rate_limiter: Arc<dyn RateLimiter> = Arc::new(
        cadence_infra::InMemoryRateLimiter::new(config.rate_limit.clone())
            .map_err(|e| std::io::Error::other(format!("invalid rate limit configuration: {e}")))?,
    );

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(handlers::configure_routes);

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(RateLimitMiddleware::new(rate_limiter.clone()));

        app.wrap(RequestIdMiddleware).wrap(TracingLogger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }

    server
}
