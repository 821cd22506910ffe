//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use cadence_core::publishing::PublishingConfig;
use cadence_core::services::SweepConfig;
use cadence_infra::database::{DatabaseConfig, SecondaryDbConfig};
use cadence_infra::{JwtConfig, SimulatedTransportConfig};

#[cfg(feature = "rate-limit")]
use cadence_infra::RateLimitConfig;

use crate::background::SchedulerConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub publishing: PublishingConfig,
    /// Transport behind the manual dispatch publishers.
    pub transport: SimulatedTransportConfig,
    /// Transport used by the cron publish sweep.
    pub sweep_transport: SimulatedTransportConfig,
    pub sweep: SweepConfig,
    pub scheduler: SchedulerConfig,
    pub jobs: JobQueueSettings,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

/// Which job queue backend to start, if any.
#[derive(Debug, Clone, Default)]
pub struct JobQueueSettings {
    /// Set when `REDIS_URL` is present.
    pub redis: bool,
    /// Fall back to the in-process queue when Redis is absent or unreachable.
    pub in_memory: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|main_url| DatabaseConfig {
            main_url,
            main_max_connections: parse_env("DB_MAX_CONNECTIONS", 100),
            main_min_connections: parse_env("DB_MIN_CONNECTIONS", 10),
            connect_timeout: Duration::from_secs(parse_env("DB_CONNECT_TIMEOUT_SECS", 8)),
            secondary_databases: Self::parse_secondary_databases(),
        });

        let transport_defaults = SimulatedTransportConfig::default();
        let transport = SimulatedTransportConfig {
            min_latency: Duration::from_millis(parse_env(
                "PUBLISH_MIN_LATENCY_MS",
                transport_defaults.min_latency.as_millis() as u64,
            )),
            max_latency: Duration::from_millis(parse_env(
                "PUBLISH_MAX_LATENCY_MS",
                transport_defaults.max_latency.as_millis() as u64,
            )),
            failure_rate: parse_env("PUBLISH_FAILURE_RATE", transport_defaults.failure_rate),
        };
        let sweep_transport = SimulatedTransportConfig::fixed(
            Duration::from_millis(parse_env("SWEEP_PUBLISH_LATENCY_MS", 1_000)),
            parse_env("SWEEP_FAILURE_RATE", 0.1),
        );

        let publishing = PublishingConfig {
            max_retries: parse_env("PUBLISH_MAX_RETRIES", 3),
            retry_delay: Duration::from_millis(parse_env("PUBLISH_RETRY_DELAY_MS", 1_000)),
        };

        let sweep = SweepConfig {
            auto_approval_window: approval_window(parse_env("AUTO_APPROVAL_WINDOW_MINUTES", 60)),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT", 8080),
            database,
            jwt: JwtConfig::from_env(),
            publishing,
            transport,
            sweep_transport,
            sweep,
            scheduler: SchedulerConfig::from_env(),
            jobs: JobQueueSettings {
                redis: env::var("REDIS_URL").is_ok(),
                in_memory: parse_flag("JOB_QUEUE_IN_MEMORY", false),
            },
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }

    /// Parse secondary databases from environment.
    /// Format: SECONDARY_DB_<NAME>=<URL>,<MAX_CONNECTIONS>
    /// Example: SECONDARY_DB_ANALYTICS=postgres://...,20
    fn parse_secondary_databases() -> Vec<SecondaryDbConfig> {
        let mut secondary = Vec::new();

        for (key, value) in env::vars() {
            if let Some(name) = key.strip_prefix("SECONDARY_DB_") {
                let (url, max_connections) = match value.split_once(',') {
                    Some((url, max)) => (url, max.trim().parse().unwrap_or(20)),
                    None => (value.as_str(), 20),
                };
                if url.is_empty() {
                    tracing::warn!(name = %name, "Ignoring secondary database without URL");
                    continue;
                }

                secondary.push(SecondaryDbConfig {
                    name: name.to_lowercase(),
                    url: url.to_string(),
                    max_connections,
                });
            }
        }

        secondary
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn parse_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v != "false" && v != "0")
        .unwrap_or(default)
}

/// Auto-approval window from a minute count; out-of-range values fall back to
/// the default window.
fn approval_window(minutes: i64) -> TimeDelta {
    TimeDelta::try_minutes(minutes).unwrap_or_else(|| {
        let fallback = SweepConfig::default().auto_approval_window;
        tracing::warn!(
            minutes,
            fallback_minutes = fallback.num_minutes(),
            "AUTO_APPROVAL_WINDOW_MINUTES out of range, using default"
        );
        fallback
    })
}
