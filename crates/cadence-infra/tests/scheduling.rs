mod common;

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use cadence_core::DomainError;
use cadence_core::domain::{ApprovalAction, Platform, PostStatus, Schedule, ScheduleStatus};
use cadence_core::ports::Repositories;
use cadence_core::services::{SchedulingService, SweepConfig};

use common::*;

fn scheduling(
    repos: &Repositories,
    transport: Arc<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
) -> SchedulingService {
    SchedulingService::new(repos.clone(), transport, notifier, SweepConfig::default())
}

async fn schedule_at(repos: &Repositories, post_id: Uuid, tenant_id: Uuid, offset: TimeDelta) -> Schedule {
    // Created in the past so `offset` may be negative.
    let created = Utc::now() - TimeDelta::hours(3);
    let schedule = Schedule::new(
        post_id,
        tenant_id,
        Utc::now() + offset,
        "America/New_York".into(),
        created,
    )
    .unwrap();
    repos.schedules.create(schedule).await.unwrap()
}

#[tokio::test]
async fn test_auto_approves_pending_post_inside_window() {
    let repos = repos();
    let notifier = Arc::new(RecordingNotifier::default());
    let service = scheduling(&repos, ScriptedTransport::reliable(), notifier.clone());
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::PendingApproval).await;
    schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(30)).await;

    let report = service.run_auto_approval_sweep(Utc::now(), None).await;

    assert_eq!(report.auto_approved, 1);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Scheduled);

    let logs = repos.approvals.find_by_post(post.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, ApprovalAction::Approved);
    assert!(logs[0].actor_id.is_none());
    assert_eq!(
        logs[0].feedback.as_deref(),
        Some("Auto-approved: no response within 1 hour window")
    );
    assert_eq!(logs[0].metadata["autoApproved"], true);
    assert_eq!(logs[0].metadata["windowMinutes"], 60);

    assert_eq!(*notifier.auto_approved.lock().unwrap(), vec![post.id]);
}

#[tokio::test]
async fn test_pending_post_outside_window_is_left_alone() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::PendingApproval).await;
    schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(90)).await;

    let report = service.run_sweeps(Utc::now(), None).await;

    assert_eq!(report.auto_approved, 0);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::PendingApproval);
    assert!(repos.approvals.find_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_due_scheduled_post_is_published() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let service = scheduling(&repos, transport.clone(), Arc::new(RecordingNotifier::default()));
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(
        &repos,
        &brand,
        content(&[Platform::Facebook, Platform::Linkedin]),
        PostStatus::Scheduled,
    )
    .await;
    let schedule = schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(-5)).await;

    let report = service.run_publish_sweep(Utc::now(), None).await;

    assert_eq!(report.published, 1);
    let stored = reload(&repos, post.id).await;
    assert_eq!(stored.status, PostStatus::Published);
    assert!(stored.published_at.is_some());

    let schedule = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Completed);

    // One send for the whole post, one analytics row per platform.
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, vec![Platform::Facebook, Platform::Linkedin]);
    assert_eq!(sent[0].1, "Big news\n\nWe shipped it.");

    let analytics = repos.analytics.find_by_post(post.id).await.unwrap();
    assert_eq!(analytics.len(), 2);
    assert!(
        analytics
            .iter()
            .all(|a| a.metadata["source"] == "scheduled_publish")
    );
}

#[tokio::test]
async fn test_failed_scheduled_publish_marks_both_failed() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::failing_first(1),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::X]), PostStatus::Scheduled).await;
    let schedule = schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(-1)).await;

    let report = service.run_publish_sweep(Utc::now(), None).await;

    assert_eq!(report.failed, 1);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Failed);
    let schedule = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Failed);
    assert!(repos.analytics.find_by_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sweep_records_one_row_per_distinct_platform() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let service = scheduling(&repos, transport.clone(), Arc::new(RecordingNotifier::default()));
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(
        &repos,
        &brand,
        content(&[Platform::X, Platform::Linkedin, Platform::X]),
        PostStatus::Scheduled,
    )
    .await;
    schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(-1)).await;

    let report = service.run_publish_sweep(Utc::now(), None).await;

    assert_eq!(report.published, 1);
    assert_eq!(transport.sent()[0].0, vec![Platform::X, Platform::Linkedin]);
    let rows = repos.analytics.find_by_post(post.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|r| r.platform == Platform::X).count(), 1);
}

#[tokio::test]
async fn test_sweep_survives_failed_schedule_write() {
    let mut repos = repos();
    repos.schedules = FlakySchedules::failing_first(repos.schedules.clone(), 1);
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::Facebook]), PostStatus::Scheduled).await;
    let schedule = schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(-1)).await;

    let first = service.run_publish_sweep(Utc::now(), None).await;

    assert_eq!(first.published, 1);
    assert_eq!(first.errors, 0);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Published);
    assert_eq!(repos.analytics.find_by_post(post.id).await.unwrap().len(), 1);
    let stuck = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(stuck.status, ScheduleStatus::Pending);

    let second = service.run_publish_sweep(Utc::now(), None).await;

    assert_eq!(second.skipped, 1);
    assert_eq!(second.published, 0);
    let closed = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(closed.status, ScheduleStatus::Completed);
    assert_eq!(repos.analytics.find_by_post(post.id).await.unwrap().len(), 1);
    assert_eq!(service.status(brand.tenant_id).await.unwrap().pending_schedules, 0);
}

#[tokio::test]
async fn test_due_post_awaiting_approval_is_skipped() {
    let repos = repos();
    let transport = ScriptedTransport::reliable();
    let service = scheduling(&repos, transport.clone(), Arc::new(RecordingNotifier::default()));
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::X]), PostStatus::PendingApproval).await;
    let schedule = schedule_at(&repos, post.id, brand.tenant_id, TimeDelta::minutes(-1)).await;

    let report = service.run_publish_sweep(Utc::now(), None).await;

    assert_eq!(report.skipped, 1);
    assert_eq!(transport.calls(), 0);
    let schedule = repos.schedules.find_by_id(schedule.id).await.unwrap().unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Pending);
}

#[tokio::test]
async fn test_tenant_scoped_sweep_ignores_other_tenants() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let ours = brand(&repos, Uuid::new_v4()).await;
    let theirs = brand(&repos, Uuid::new_v4()).await;

    let our_post = post(&repos, &ours, content(&[Platform::X]), PostStatus::Scheduled).await;
    let their_post = post(&repos, &theirs, content(&[Platform::X]), PostStatus::Scheduled).await;
    schedule_at(&repos, our_post.id, ours.tenant_id, TimeDelta::minutes(-1)).await;
    schedule_at(&repos, their_post.id, theirs.tenant_id, TimeDelta::minutes(-1)).await;

    let report = service.run_sweeps(Utc::now(), Some(ours.tenant_id)).await;

    assert_eq!(report.published, 1);
    assert_eq!(reload(&repos, our_post.id).await.status, PostStatus::Published);
    assert_eq!(reload(&repos, their_post.id).await.status, PostStatus::Scheduled);
}

#[tokio::test]
async fn test_schedule_post_moves_approved_post_to_scheduled() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::X]), PostStatus::Approved).await;
    let now = Utc::now();

    let schedule = service
        .schedule_post(post.id, brand.tenant_id, now + TimeDelta::days(1), "UTC".into(), now)
        .await
        .unwrap();

    assert_eq!(schedule.status, ScheduleStatus::Pending);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Scheduled);

    // A second pending schedule for the same post is refused.
    let err = service
        .schedule_post(post.id, brand.tenant_id, now + TimeDelta::days(2), "UTC".into(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn test_schedule_post_keeps_pending_approval() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::X]), PostStatus::PendingApproval).await;
    let now = Utc::now();

    service
        .schedule_post(post.id, brand.tenant_id, now + TimeDelta::hours(4), "UTC".into(), now)
        .await
        .unwrap();

    assert_eq!(reload(&repos, post.id).await.status, PostStatus::PendingApproval);
}

#[tokio::test]
async fn test_schedule_post_rejects_past_run_time_and_drafts() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let now = Utc::now();

    let approved = post(&repos, &brand, content(&[Platform::X]), PostStatus::Approved).await;
    let err = service
        .schedule_post(approved.id, brand.tenant_id, now - TimeDelta::minutes(1), "UTC".into(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let draft = post(&repos, &brand, content(&[Platform::X]), PostStatus::Draft).await;
    let err = service
        .schedule_post(draft.id, brand.tenant_id, now + TimeDelta::hours(1), "UTC".into(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_cancelled_schedule_can_be_rearmed() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let brand = brand(&repos, Uuid::new_v4()).await;
    let post = post(&repos, &brand, content(&[Platform::X]), PostStatus::Approved).await;
    let now = Utc::now();

    let first = service
        .schedule_post(post.id, brand.tenant_id, now + TimeDelta::hours(1), "UTC".into(), now)
        .await
        .unwrap();
    let cancelled = service.cancel_schedule(post.id, brand.tenant_id).await.unwrap();
    assert_eq!(cancelled.status, ScheduleStatus::Cancelled);
    assert_eq!(reload(&repos, post.id).await.status, PostStatus::Scheduled);

    let err = service.cancel_schedule(post.id, brand.tenant_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let rearmed = service
        .schedule_post(post.id, brand.tenant_id, now + TimeDelta::hours(6), "Asia/Tokyo".into(), now)
        .await
        .unwrap();
    assert_eq!(rearmed.id, first.id);
    assert_eq!(rearmed.status, ScheduleStatus::Pending);
    assert_eq!(rearmed.timezone, "Asia/Tokyo");
}

#[tokio::test]
async fn test_status_counts_tenant_posts() {
    let repos = repos();
    let service = scheduling(
        &repos,
        ScriptedTransport::reliable(),
        Arc::new(RecordingNotifier::default()),
    );
    let own = brand(&repos, Uuid::new_v4()).await;
    let other = brand(&repos, Uuid::new_v4()).await;

    post(&repos, &own, content(&[Platform::X]), PostStatus::PendingApproval).await;
    post(&repos, &own, content(&[Platform::X]), PostStatus::PendingApproval).await;
    let scheduled = post(&repos, &own, content(&[Platform::X]), PostStatus::Scheduled).await;
    post(&repos, &own, content(&[Platform::X]), PostStatus::Published).await;
    post(&repos, &other, content(&[Platform::X]), PostStatus::Failed).await;
    schedule_at(&repos, scheduled.id, own.tenant_id, TimeDelta::hours(5)).await;

    let status = service.status(own.tenant_id).await.unwrap();

    assert_eq!(status.pending_approval, 2);
    assert_eq!(status.scheduled, 1);
    assert_eq!(status.published, 1);
    assert_eq!(status.failed, 0);
    assert_eq!(status.pending_schedules, 1);
}
