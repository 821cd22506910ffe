//! Simulated platform transport: random latency and injected failures.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde_json::json;

use cadence_core::ports::{Delivery, PublishTransport, TransportError, TransportReceipt};

#[derive(Debug, Clone)]
pub struct SimulatedTransportConfig {
    pub min_latency: Duration,
    pub max_latency: Duration,
    /// Probability in `[0, 1]` that a send fails.
    pub failure_rate: f64,
}

impl Default for SimulatedTransportConfig {
    fn default() -> Self {
        Self {
            min_latency: Duration::from_millis(500),
            max_latency: Duration::from_millis(2_000),
            failure_rate: 0.1,
        }
    }
}

impl SimulatedTransportConfig {
    /// Instant, never-failing transport for tests.
    pub fn reliable() -> Self {
        Self {
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    /// Fixed latency, as used by the cron sweep.
    pub fn fixed(latency: Duration, failure_rate: f64) -> Self {
        Self {
            min_latency: latency,
            max_latency: latency,
            failure_rate,
        }
    }
}

pub struct SimulatedTransport {
    config: SimulatedTransportConfig,
}

impl SimulatedTransport {
    pub fn new(config: SimulatedTransportConfig) -> Self {
        let failure_rate = if config.failure_rate.is_nan() {
            0.0
        } else {
            config.failure_rate.clamp(0.0, 1.0)
        };
        let max_latency = config.max_latency.max(config.min_latency);
        Self {
            config: SimulatedTransportConfig {
                failure_rate,
                max_latency,
                ..config
            },
        }
    }

    fn draw(&self) -> (Duration, bool, u32) {
        let mut rng = rand::thread_rng();
        let latency = if self.config.max_latency > self.config.min_latency {
            rng.gen_range(self.config.min_latency..=self.config.max_latency)
        } else {
            self.config.min_latency
        };
        let fails = rng.gen_bool(self.config.failure_rate);
        (latency, fails, rng.gen_range(100_000..1_000_000))
    }
}

#[async_trait]
impl PublishTransport for SimulatedTransport {
    async fn send(&self, delivery: Delivery<'_>) -> Result<TransportReceipt, TransportError> {
        let (latency, fails, suffix) = self.draw();
        tokio::time::sleep(latency).await;

        let names = delivery
            .platforms
            .iter()
            .map(|p| p.display_name())
            .collect::<Vec<_>>()
            .join(", ");

        if fails {
            tracing::debug!(post_id = %delivery.post_id, platforms = %names, "Simulated publish failure");
            return Err(TransportError::Remote(format!(
                "Simulated {names} API failure"
            )));
        }

        let prefix = match delivery.platforms {
            [single] => single.as_str().to_lowercase(),
            _ => "multi".to_string(),
        };

        Ok(TransportReceipt {
            platform_post_id: format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis()),
            metadata: json!({
                "simulated": true,
                "platforms": delivery.platforms,
                "characters": delivery.text.chars().count(),
                "latencyMs": latency.as_millis() as u64,
            }),
        })
    }

    fn is_configured(&self) -> bool {
        true
    }
}
