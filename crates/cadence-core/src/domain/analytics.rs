use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Platform;

/// Engagement counters reported for one post on one platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub impressions: i64,
    pub engagement: i64,
    pub clicks: i64,
    pub shares: i64,
    pub comments: i64,
    pub likes: i64,
}

impl EngagementMetrics {
    /// Placeholder metrics until real platform insights are wired in.
    pub fn simulated() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            impressions: rng.gen_range(100..10_000),
            engagement: rng.gen_range(10..1_000),
            clicks: rng.gen_range(5..500),
            shares: rng.gen_range(0..100),
            comments: rng.gen_range(0..50),
            likes: rng.gen_range(10..1_000),
        }
    }
}

/// Append-only analytics data point for a (post, platform) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAnalytics {
    pub id: Uuid,
    pub post_id: Uuid,
    pub tenant_id: Uuid,
    pub platform: Platform,
    #[serde(flatten)]
    pub metrics: EngagementMetrics,
    pub recorded_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl PostAnalytics {
    pub fn new(
        post_id: Uuid,
        tenant_id: Uuid,
        platform: Platform,
        metrics: EngagementMetrics,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            tenant_id,
            platform,
            metrics,
            recorded_at: Utc::now(),
            metadata,
        }
    }
}
