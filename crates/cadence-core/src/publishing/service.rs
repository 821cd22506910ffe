//! Dispatch orchestration: fan a post out to its platforms with bounded
//! retries, record analytics for each success and settle the post status.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::factory::PublisherFactory;
use super::publisher::{PublishPayload, PublishResult, Publisher};
use crate::domain::{
    EngagementMetrics, Platform, Post, PostAnalytics, PostStatus, Schedule, ScheduleStatus,
};
use crate::error::DomainError;
use crate::ports::Repositories;

#[derive(Debug, Clone)]
pub struct PublishingConfig {
    /// Attempts per platform, including the first one.
    pub max_retries: u32,
    /// Base delay; after failed attempt `n` (zero-based) the next try waits
    /// `retry_delay * (n + 1)`.
    pub retry_delay: Duration,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1_000),
        }
    }
}

/// Per-platform line of a dispatch report.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformDispatchOutcome {
    pub platform: Platform,
    pub success: bool,
    pub platform_post_id: Option<String>,
    pub error: Option<String>,
    /// Zero-based index of the last attempt made.
    pub retry_count: u32,
    pub published_at: Option<DateTime<Utc>>,
}

impl PlatformDispatchOutcome {
    fn failed(platform: Platform, error: String, retry_count: u32) -> Self {
        Self {
            platform,
            success: false,
            platform_post_id: None,
            error: Some(error),
            retry_count,
            published_at: None,
        }
    }

    fn succeeded(platform: Platform, result: PublishResult, retry_count: u32) -> Self {
        Self {
            platform,
            success: true,
            platform_post_id: result.platform_post_id,
            error: None,
            retry_count,
            published_at: result.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub post_id: Uuid,
    pub success: bool,
    pub results: Vec<PlatformDispatchOutcome>,
    pub total_platforms: usize,
    pub successful_platforms: usize,
    pub failed_platforms: usize,
}

impl DispatchResult {
    fn from_outcomes(post_id: Uuid, results: Vec<PlatformDispatchOutcome>) -> Self {
        let successful_platforms = results.iter().filter(|r| r.success).count();
        let total_platforms = results.len();
        Self {
            post_id,
            success: successful_platforms > 0 || total_platforms == 0,
            total_platforms,
            successful_platforms,
            failed_platforms: total_platforms - successful_platforms,
            results,
        }
    }
}

/// A post together with everything recorded about its delivery.
#[derive(Debug, Clone, Serialize)]
pub struct PublishStatus {
    pub post: Post,
    pub schedule: Option<Schedule>,
    pub analytics: Vec<PostAnalytics>,
}

pub struct PublishingService {
    repos: Repositories,
    publishers: Arc<PublisherFactory>,
    config: PublishingConfig,
}

impl PublishingService {
    pub fn new(
        repos: Repositories,
        publishers: Arc<PublisherFactory>,
        config: PublishingConfig,
    ) -> Self {
        Self {
            repos,
            publishers,
            config,
        }
    }

    pub fn publishers(&self) -> &PublisherFactory {
        &self.publishers
    }

    /// Publish `post_id` to every platform it targets.
    ///
    /// Platforms run sequentially; one platform failing never stops the
    /// others. The post ends PUBLISHED when at least one platform succeeded
    /// and FAILED otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch_post(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<DispatchResult, DomainError> {
        let mut post = self
            .repos
            .posts
            .find_for_tenant(post_id, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let platforms = post.content.target_platforms();
        if platforms.is_empty() {
            tracing::info!(post_id = %post_id, "Post targets no platforms, nothing to dispatch");
            return Ok(DispatchResult::from_outcomes(post_id, Vec::new()));
        }

        if !post.status.is_dispatchable() {
            return Err(DomainError::InvalidTransition {
                from: post.status,
                to: PostStatus::Scheduled,
            });
        }
        post.transition_to(PostStatus::Scheduled)?;
        self.repos
            .posts
            .update_status(post.id, PostStatus::Scheduled, None)
            .await?;

        let brand = self
            .repos
            .brands
            .find_for_tenant(post.brand_id, tenant_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(post_id = %post_id, error = %e, "Brand lookup failed, dispatching without brand details");
                None
            });
        let schedule = self
            .repos
            .schedules
            .find_by_post(post.id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(post_id = %post_id, error = %e, "Schedule lookup failed");
                None
            });
        let payload = PublishPayload::from_post(&post, brand.as_ref(), schedule.as_ref().map(|s| s.run_at));

        let mut outcomes = Vec::with_capacity(platforms.len());
        for platform in platforms {
            outcomes.push(self.dispatch_to_platform(&post, platform, &payload).await);
        }
        let result = DispatchResult::from_outcomes(post.id, outcomes);

        self.settle(&post, schedule.as_ref(), &result).await;

        tracing::info!(
            post_id = %post_id,
            successful = result.successful_platforms,
            failed = result.failed_platforms,
            "Dispatch finished"
        );
        Ok(result)
    }

    async fn dispatch_to_platform(
        &self,
        post: &Post,
        platform: Platform,
        payload: &PublishPayload,
    ) -> PlatformDispatchOutcome {
        let publisher = match self.publishers.create_publisher(platform) {
            Ok(publisher) => publisher,
            Err(e) => return PlatformDispatchOutcome::failed(platform, e.to_string(), 0),
        };

        let (result, retry_count) = self.publish_with_retry(publisher.as_ref(), payload).await;
        if !result.success {
            let error = result
                .error
                .unwrap_or_else(|| "Publish failed".to_string());
            return PlatformDispatchOutcome::failed(platform, error, retry_count);
        }

        let record = PostAnalytics::new(
            post.id,
            post.tenant_id,
            platform,
            EngagementMetrics::simulated(),
            json!({
                "source": "dispatch",
                "platformPostId": result.platform_post_id,
                "retryCount": retry_count,
            }),
        );
        if let Err(e) = self.repos.analytics.append(record).await {
            tracing::error!(post_id = %post.id, platform = %platform, error = %e, "Failed to record analytics");
            return PlatformDispatchOutcome::failed(
                platform,
                format!("Failed to record analytics: {e}"),
                retry_count,
            );
        }

        PlatformDispatchOutcome::succeeded(platform, result, retry_count)
    }

    /// Validate then publish, up to `max_retries` attempts. Invalid content is
    /// never sent and never retried.
    async fn publish_with_retry(
        &self,
        publisher: &dyn Publisher,
        payload: &PublishPayload,
    ) -> (PublishResult, u32) {
        let platform = publisher.platform();
        let max_attempts = self.config.max_retries.max(1);
        let mut last_error = None;
        let mut attempt = 0;

        while attempt < max_attempts {
            let validation = publisher.validate_content(payload);
            if !validation.valid {
                let error = validation.errors.join("; ");
                tracing::warn!(post_id = %payload.post_id, platform = %platform, error = %error, "Content failed validation");
                last_error = Some(error);
                break;
            }

            let result = publisher.publish(payload).await;
            if result.success {
                return (result, attempt);
            }

            let error = result
                .error
                .unwrap_or_else(|| "Publish failed".to_string());
            tracing::warn!(
                post_id = %payload.post_id,
                platform = %platform,
                attempt = attempt + 1,
                max_attempts,
                error = %error,
                "Publish attempt failed"
            );
            last_error = Some(error);

            if attempt + 1 < max_attempts {
                tokio::time::sleep(retry_backoff(self.config.retry_delay, attempt)).await;
            }
            attempt += 1;
        }

        let retry_count = attempt.min(max_attempts - 1);
        let error = last_error.unwrap_or_else(|| "Publish failed".to_string());
        (PublishResult::failed(error), retry_count)
    }

    /// Write the final post status and close out a pending schedule. Failures
    /// are logged; the dispatch result stands either way.
    async fn settle(&self, post: &Post, schedule: Option<&Schedule>, result: &DispatchResult) {
        let (status, schedule_status, published_at) = if result.successful_platforms > 0 {
            (PostStatus::Published, ScheduleStatus::Completed, Some(Utc::now()))
        } else {
            (PostStatus::Failed, ScheduleStatus::Failed, None)
        };

        if let Err(e) = self
            .repos
            .posts
            .update_status(post.id, status, published_at)
            .await
        {
            tracing::error!(post_id = %post.id, status = %status, error = %e, "Failed to write final post status");
        }

        if let Some(schedule) = schedule.filter(|s| s.status == ScheduleStatus::Pending) {
            if let Err(e) = self
                .repos
                .schedules
                .update_status(schedule.id, schedule_status)
                .await
            {
                tracing::error!(schedule_id = %schedule.id, error = %e, "Failed to close schedule");
            }
        }
    }

    /// The post, its schedule and every analytics row recorded for it.
    pub async fn publish_status(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<PublishStatus, DomainError> {
        let post = self
            .repos
            .posts
            .find_for_tenant(post_id, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        let schedule = self.repos.schedules.find_by_post(post.id).await?;
        let analytics = self.repos.analytics.find_by_post(post.id).await?;

        Ok(PublishStatus {
            post,
            schedule,
            analytics,
        })
    }
}

/// Linear delay after failed attempt `attempt` (zero-based). An overflowing
/// product falls back to the default base delay.
fn retry_backoff(base: Duration, attempt: u32) -> Duration {
    base.checked_mul(attempt.saturating_add(1))
        .unwrap_or_else(|| {
            let fallback = PublishingConfig::default().retry_delay;
            tracing::warn!(
                retry_delay_ms = base.as_millis() as u64,
                attempt,
                fallback_ms = fallback.as_millis() as u64,
                "Retry delay overflowed, using default"
            );
            fallback
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dispatch_counts_as_success() {
        let result = DispatchResult::from_outcomes(Uuid::new_v4(), Vec::new());
        assert!(result.success);
        assert_eq!(result.total_platforms, 0);
        assert_eq!(result.failed_platforms, 0);
    }

    #[test]
    fn test_partial_success_counts() {
        let outcomes = vec![
            PlatformDispatchOutcome::failed(Platform::X, "too long".into(), 0),
            PlatformDispatchOutcome::succeeded(
                Platform::Linkedin,
                PublishResult::succeeded("li_1".into(), json!({})),
                1,
            ),
        ];
        let result = DispatchResult::from_outcomes(Uuid::new_v4(), outcomes);

        assert!(result.success);
        assert_eq!(result.successful_platforms, 1);
        assert_eq!(result.failed_platforms, 1);
        assert_eq!(result.total_platforms, 2);
    }

    #[test]
    fn test_retry_backoff_is_linear() {
        let base = Duration::from_millis(250);
        assert_eq!(retry_backoff(base, 0), Duration::from_millis(250));
        assert_eq!(retry_backoff(base, 2), Duration::from_millis(750));
    }

    #[test]
    fn test_retry_backoff_overflow_uses_default() {
        assert_eq!(
            retry_backoff(Duration::MAX, 1),
            PublishingConfig::default().retry_delay
        );
    }

    #[test]
    fn test_default_config() {
        let config = PublishingConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1_000));
    }
}
