mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use cadence_core::DomainError;
use cadence_core::domain::{Platform, PostStatus, Schedule, ScheduleStatus};
use cadence_core::ports::Repositories;
use cadence_core::publishing::{
    Publisher, PublisherFactory, PublishingConfig, PublishingService, XPublisher,
};

use common::*;

#[tokio::test]
async fn test_over_long_x_post_fails_without_reaching_transport() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let service = fast_publishing(&repos, transport.clone());
    let brand = brand(&repos, Uuid::new_v4()).await;

    let mut content = content(&[Platform::X]);
    content.hook = String::new();
    content.hashtags.clear();
    content.body = "a".repeat(300);
    let post = post(&repos, &brand, content, PostStatus::Approved).await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.total_platforms, 1);
    assert_eq!(result.failed_platforms, 1);
    let outcome = &result.results[0];
    assert_eq!(outcome.retry_count, 0);
    assert!(outcome.error.as_deref().unwrap().contains("280"));
    assert_eq!(transport.calls(), 0);

    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Failed);
    assert!(repos.analytics.find_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_success_publishes_post() {
    let repos = repos();
    let service = fast_publishing(&repos, ScriptedTransport::reliable());
    let brand = brand(&repos, Uuid::new_v4()).await;
    // Instagram needs an image; Facebook does not.
    let post = post(
        &repos,
        &brand,
        content(&[Platform::Facebook, Platform::Instagram]),
        PostStatus::Approved,
    )
    .await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(result.success);
    assert_eq!(result.total_platforms, 2);
    assert_eq!(result.successful_platforms, 1);
    assert_eq!(result.failed_platforms, 1);

    let instagram = result
        .results
        .iter()
        .find(|r| r.platform == Platform::Instagram)
        .unwrap();
    assert!(!instagram.success);
    assert!(instagram.error.as_deref().unwrap().contains("image"));

    let stored = reload(&repos, post.id).await;
    assert_eq!(stored.status, PostStatus::Published);
    assert!(stored.published_at.is_some());

    let analytics = repos.analytics.find_by_post(post.id).await.unwrap();
    assert_eq!(analytics.len(), 1);
    assert_eq!(analytics[0].platform, Platform::Facebook);
    assert_eq!(analytics[0].metadata["source"], "dispatch");
}

#[tokio::test]
async fn test_post_without_platforms_is_left_untouched() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let service = fast_publishing(&repos, transport.clone());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[]), PostStatus::Draft).await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(result.success);
    assert_eq!(result.total_platforms, 0);
    assert!(result.results.is_empty());
    assert_eq!(transport.calls(), 0);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let repos = repos();
    let transport = ScriptedTransport::failing_first(2);
    let service = fast_publishing(&repos, transport.clone());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Linkedin]), PostStatus::Approved).await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(result.success);
    assert_eq!(result.results[0].retry_count, 2);
    assert_eq!(transport.calls(), 3);

    let analytics = repos.analytics.find_by_post(post.id).await.unwrap();
    assert_eq!(analytics.len(), 1);
    assert_eq!(analytics[0].metadata["retryCount"], 2);
}

#[tokio::test]
async fn test_exhausted_retries_fail_post_and_schedule() {
    let repos = repos();
    let transport = ScriptedTransport::failing_for(&[Platform::Facebook]);
    let service = fast_publishing(&repos, transport.clone());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::Scheduled).await;

    let now = Utc::now();
    let schedule = repos
        .schedules
        .create(
            Schedule::new(post.id, brand.tenant_id, now + TimeDelta::hours(2), "UTC".into(), now)
                .unwrap(),
        )
        .await
        .unwrap();

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.results[0].retry_count, 2);
    assert_eq!(transport.calls(), 3);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Failed);

    let schedule = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Failed);
}

#[tokio::test]
async fn test_successful_dispatch_completes_pending_schedule() {
    let repos = repos();
    let service = fast_publishing(&repos, ScriptedTransport::reliable());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::Scheduled).await;

    let now = Utc::now();
    let schedule = repos
        .schedules
        .create(
            Schedule::new(post.id, brand.tenant_id, now + TimeDelta::hours(2), "UTC".into(), now)
                .unwrap(),
        )
        .await
        .unwrap();

    service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    let schedule = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Completed);
}

#[tokio::test]
async fn test_analytics_write_failure_marks_platform_failed() {
    let mut repos: Repositories = repos();
    repos.analytics = Arc::new(BrokenAnalytics);
    let service = fast_publishing(&repos, ScriptedTransport::reliable());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::Approved).await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(!result.success);
    assert!(
        result.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("analytics")
    );
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Failed);
}

#[tokio::test]
async fn test_unregistered_platform_fails_alone() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let factory = PublisherFactory::with_publishers([
        Arc::new(XPublisher::new(transport.clone())) as Arc<dyn Publisher>
    ]);
    let service = PublishingService::new(
        repos.clone(),
        Arc::new(factory),
        PublishingConfig {
            max_retries: 3,
            retry_delay: Duration::ZERO,
        },
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(
        &repos,
        &brand,
        content(&[Platform::X, Platform::Tiktok]),
        PostStatus::Approved,
    )
    .await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert!(result.success);
    let tiktok = result
        .results
        .iter()
        .find(|r| r.platform == Platform::Tiktok)
        .unwrap();
    assert!(!tiktok.success);
    assert_eq!(tiktok.retry_count, 0);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_duplicate_platforms_are_dispatched_once() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let service = fast_publishing(&repos, transport.clone());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(
        &repos,
        &brand,
        content(&[Platform::Linkedin, Platform::Linkedin]),
        PostStatus::Approved,
    )
    .await;

    let result = service.dispatch_post(post.id, brand.tenant_id).await.unwrap();

    assert_eq!(result.total_platforms, 1);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_draft_post_cannot_be_dispatched() {
    let repos = repos();
    let service = fast_publishing(&repos, ScriptedTransport::reliable());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::Draft).await;

    let err = service
        .dispatch_post(post.id, brand.tenant_id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::InvalidTransition {
            from: PostStatus::Draft,
            ..
        }
    ));
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_post_of_another_tenant_is_not_found() {
    let repos = repos();
    let service = fast_publishing(&repos, ScriptedTransport::reliable());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::Approved).await;

    let err = service
        .dispatch_post(post.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = service
        .publish_status(post.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_publish_status_collects_delivery_records() {
    let repos = repos();
    let service = fast_publishing(&repos, ScriptedTransport::reliable());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(
        &repos,
        &brand,
        with_image(content(&[Platform::Facebook, Platform::Instagram])),
        PostStatus::Failed,
    )
    .await;

    service.dispatch_post(post.id, brand.tenant_id).await.unwrap();
    let status = service.publish_status(post.id, brand.tenant_id).await.unwrap();

    assert_eq!(status.post.status, PostStatus::Published);
    assert!(status.schedule.is_none());
    assert_eq!(status.analytics.len(), 2);
}
