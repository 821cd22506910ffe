//! Schedule management and the periodic sweeps: publish what is due and
//! auto-approve posts whose approver stayed silent.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    ApprovalAction, ApprovalLog, EngagementMetrics, PostAnalytics, PostStatus, Schedule,
    ScheduleStatus,
};
use crate::error::DomainError;
use crate::ports::{ApprovalNotifier, Delivery, PublishTransport, Repositories};

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Posts still awaiting approval this close to their run time are approved.
    pub auto_approval_window: TimeDelta,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            auto_approval_window: TimeDelta::minutes(60),
        }
    }
}

/// Tally of one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub published: usize,
    pub failed: usize,
    pub auto_approved: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl SweepReport {
    fn merge(mut self, other: SweepReport) -> Self {
        self.published += other.published;
        self.failed += other.failed;
        self.auto_approved += other.auto_approved;
        self.skipped += other.skipped;
        self.errors += other.errors;
        self
    }
}

/// Per-tenant workflow counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulingStatus {
    pub pending_approval: u64,
    pub approved: u64,
    pub scheduled: u64,
    pub published: u64,
    pub failed: u64,
    pub pending_schedules: u64,
}

enum ItemOutcome {
    Published,
    Failed,
    AutoApproved,
    Skipped,
}

pub struct SchedulingService {
    repos: Repositories,
    transport: Arc<dyn PublishTransport>,
    notifier: Arc<dyn ApprovalNotifier>,
    config: SweepConfig,
}

impl SchedulingService {
    pub fn new(
        repos: Repositories,
        transport: Arc<dyn PublishTransport>,
        notifier: Arc<dyn ApprovalNotifier>,
        config: SweepConfig,
    ) -> Self {
        Self {
            repos,
            transport,
            notifier,
            config,
        }
    }

    /// Create or re-arm the schedule of a post. Posts past approval move to
    /// SCHEDULED; posts awaiting approval keep waiting.
    pub async fn schedule_post(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        run_at: DateTime<Utc>,
        timezone: String,
        now: DateTime<Utc>,
    ) -> Result<Schedule, DomainError> {
        let mut post = self
            .repos
            .posts
            .find_for_tenant(post_id, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        if !matches!(
            post.status,
            PostStatus::PendingApproval
                | PostStatus::Approved
                | PostStatus::Scheduled
                | PostStatus::Failed
        ) {
            return Err(DomainError::Validation(format!(
                "a {} post cannot be scheduled",
                post.status
            )));
        }

        let schedule = match self.repos.schedules.find_by_post(post.id).await? {
            Some(mut existing) => {
                existing.rearm(run_at, timezone, now)?;
                self.repos.schedules.update(existing).await?
            }
            None => {
                let schedule = Schedule::new(post.id, tenant_id, run_at, timezone, now)?;
                self.repos.schedules.create(schedule).await?
            }
        };

        if post.status != PostStatus::PendingApproval {
            post.transition_to(PostStatus::Scheduled)?;
            self.repos
                .posts
                .update_status(post.id, PostStatus::Scheduled, None)
                .await?;
        }

        tracing::info!(post_id = %post_id, run_at = %schedule.run_at, "Post scheduled");
        Ok(schedule)
    }

    /// Cancel the pending schedule of a post. The post keeps its status and
    /// can still be dispatched by hand or scheduled again.
    pub async fn cancel_schedule(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Schedule, DomainError> {
        let post = self
            .repos
            .posts
            .find_for_tenant(post_id, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let mut schedule = self
            .repos
            .schedules
            .find_by_post(post.id)
            .await?
            .filter(|s| s.status == ScheduleStatus::Pending)
            .ok_or_else(|| {
                DomainError::Validation(format!("post {post_id} has no pending schedule"))
            })?;

        self.repos
            .schedules
            .update_status(schedule.id, ScheduleStatus::Cancelled)
            .await?;
        schedule.status = ScheduleStatus::Cancelled;

        tracing::info!(post_id = %post_id, schedule_id = %schedule.id, "Schedule cancelled");
        Ok(schedule)
    }

    /// Run both sweeps: publishing first, then auto-approval.
    pub async fn run_sweeps(&self, now: DateTime<Utc>, tenant_id: Option<Uuid>) -> SweepReport {
        let published = self.run_publish_sweep(now, tenant_id).await;
        let approved = self.run_auto_approval_sweep(now, tenant_id).await;
        let report = published.merge(approved);

        tracing::info!(
            published = report.published,
            failed = report.failed,
            auto_approved = report.auto_approved,
            errors = report.errors,
            "Sweep finished"
        );
        report
    }

    /// Publish every SCHEDULED post whose pending schedule is due. A failing
    /// item is logged and does not abort the rest.
    pub async fn run_publish_sweep(
        &self,
        now: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> SweepReport {
        let mut report = SweepReport::default();
        let due = match self.repos.schedules.find_due(now, tenant_id).await {
            Ok(due) => due,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load due schedules");
                report.errors += 1;
                return report;
            }
        };

        for schedule in due {
            match self.publish_scheduled(&schedule).await {
                Ok(outcome) => report.count(outcome),
                Err(e) => {
                    tracing::error!(
                        schedule_id = %schedule.id,
                        post_id = %schedule.post_id,
                        error = %e,
                        "Scheduled publish failed"
                    );
                    report.errors += 1;
                }
            }
        }
        report
    }

    async fn publish_scheduled(&self, schedule: &Schedule) -> Result<ItemOutcome, DomainError> {
        let Some(post) = self.repos.posts.find_by_id(schedule.post_id).await? else {
            tracing::warn!(schedule_id = %schedule.id, "Schedule points at a missing post");
            self.close_schedule(schedule, ScheduleStatus::Cancelled).await;
            return Ok(ItemOutcome::Skipped);
        };
        if post.status != PostStatus::Scheduled {
            // Settled posts must not keep a pending schedule.
            let settled = match post.status {
                PostStatus::Published => Some(ScheduleStatus::Completed),
                PostStatus::Failed => Some(ScheduleStatus::Failed),
                PostStatus::Rejected | PostStatus::Archived => Some(ScheduleStatus::Cancelled),
                _ => None,
            };
            if let Some(status) = settled {
                self.close_schedule(schedule, status).await;
            }
            return Ok(ItemOutcome::Skipped);
        }

        let platforms = post.content.target_platforms();
        let text = [post.content.hook.as_str(), post.content.body.as_str()]
            .iter()
            .filter(|s| !s.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n");
        let delivery = Delivery {
            post_id: post.id,
            platforms: &platforms,
            text: &text,
        };

        match self.transport.send(delivery).await {
            Ok(receipt) => {
                if let Err(e) = self
                    .repos
                    .posts
                    .update_status(post.id, PostStatus::Published, Some(Utc::now()))
                    .await
                {
                    tracing::error!(post_id = %post.id, error = %e, "Failed to mark scheduled post published");
                }

                for platform in &platforms {
                    let record = PostAnalytics::new(
                        post.id,
                        post.tenant_id,
                        *platform,
                        EngagementMetrics::simulated(),
                        json!({
                            "source": "scheduled_publish",
                            "platformPostId": receipt.platform_post_id,
                        }),
                    );
                    if let Err(e) = self.repos.analytics.append(record).await {
                        tracing::error!(post_id = %post.id, platform = %platform, error = %e, "Failed to record analytics");
                    }
                }

                self.close_schedule(schedule, ScheduleStatus::Completed).await;

                tracing::info!(post_id = %post.id, "Scheduled post published");
                Ok(ItemOutcome::Published)
            }
            Err(e) => {
                tracing::warn!(post_id = %post.id, error = %e, "Scheduled post failed to publish");
                if let Err(e) = self
                    .repos
                    .posts
                    .update_status(post.id, PostStatus::Failed, None)
                    .await
                {
                    tracing::error!(post_id = %post.id, error = %e, "Failed to mark scheduled post failed");
                }
                self.close_schedule(schedule, ScheduleStatus::Failed).await;
                Ok(ItemOutcome::Failed)
            }
        }
    }

    async fn close_schedule(&self, schedule: &Schedule, status: ScheduleStatus) {
        if let Err(e) = self
            .repos
            .schedules
            .update_status(schedule.id, status)
            .await
        {
            tracing::error!(schedule_id = %schedule.id, status = %status, error = %e, "Failed to close schedule");
        }
    }

    /// Approve posts still PENDING_APPROVAL whose run time falls inside the
    /// auto-approval window.
    pub async fn run_auto_approval_sweep(
        &self,
        now: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> SweepReport {
        let mut report = SweepReport::default();
        let window_end = now + self.config.auto_approval_window;
        let candidates = match self
            .repos
            .schedules
            .find_pending_between(now, window_end, tenant_id)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load schedules for auto-approval");
                report.errors += 1;
                return report;
            }
        };

        for schedule in candidates {
            match self.auto_approve(&schedule).await {
                Ok(outcome) => report.count(outcome),
                Err(e) => {
                    tracing::error!(
                        schedule_id = %schedule.id,
                        post_id = %schedule.post_id,
                        error = %e,
                        "Auto-approval failed"
                    );
                    report.errors += 1;
                }
            }
        }
        report
    }

    async fn auto_approve(&self, schedule: &Schedule) -> Result<ItemOutcome, DomainError> {
        let Some(mut post) = self.repos.posts.find_by_id(schedule.post_id).await? else {
            return Ok(ItemOutcome::Skipped);
        };
        if post.status != PostStatus::PendingApproval {
            return Ok(ItemOutcome::Skipped);
        }

        post.transition_to(PostStatus::Scheduled)?;
        self.repos
            .posts
            .update_status(post.id, PostStatus::Scheduled, None)
            .await?;

        let window = self.config.auto_approval_window;
        self.repos
            .approvals
            .append(ApprovalLog::new(
                post.id,
                post.tenant_id,
                ApprovalAction::Approved,
                None,
                Some(format!(
                    "Auto-approved: no response within {} window",
                    describe_window(window)
                )),
                json!({
                    "autoApproved": true,
                    "windowMinutes": window.num_minutes(),
                    "runAt": schedule.run_at,
                }),
            ))
            .await?;

        if let Err(e) = self.notifier.auto_approved(&post).await {
            tracing::warn!(post_id = %post.id, error = %e, "Auto-approval notice not delivered");
        }

        tracing::info!(post_id = %post.id, run_at = %schedule.run_at, "Post auto-approved");
        Ok(ItemOutcome::AutoApproved)
    }

    pub async fn status(&self, tenant_id: Uuid) -> Result<SchedulingStatus, DomainError> {
        let mut status = SchedulingStatus {
            pending_schedules: self.repos.schedules.count_pending(tenant_id).await?,
            ..Default::default()
        };

        for entry in self.repos.posts.count_by_status(tenant_id).await? {
            match entry.status {
                PostStatus::PendingApproval => status.pending_approval = entry.count,
                PostStatus::Approved => status.approved = entry.count,
                PostStatus::Scheduled => status.scheduled = entry.count,
                PostStatus::Published => status.published = entry.count,
                PostStatus::Failed => status.failed = entry.count,
                _ => {}
            }
        }
        Ok(status)
    }
}

impl SweepReport {
    fn count(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Published => self.published += 1,
            ItemOutcome::Failed => self.failed += 1,
            ItemOutcome::AutoApproved => self.auto_approved += 1,
            ItemOutcome::Skipped => self.skipped += 1,
        }
    }
}

fn describe_window(window: TimeDelta) -> String {
    let minutes = window.num_minutes();
    match (minutes / 60, minutes % 60) {
        (1, 0) => "1 hour".to_string(),
        (hours, 0) if hours > 1 => format!("{hours} hours"),
        _ if minutes == 1 => "1 minute".to_string(),
        _ => format!("{minutes} minutes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_window() {
        assert_eq!(describe_window(TimeDelta::minutes(60)), "1 hour");
        assert_eq!(describe_window(TimeDelta::minutes(120)), "2 hours");
        assert_eq!(describe_window(TimeDelta::minutes(90)), "90 minutes");
        assert_eq!(describe_window(TimeDelta::minutes(1)), "1 minute");
    }

    #[test]
    fn test_report_merge() {
        let a = SweepReport {
            published: 2,
            errors: 1,
            ..Default::default()
        };
        let b = SweepReport {
            auto_approved: 3,
            skipped: 1,
            ..Default::default()
        };

        let merged = a.merge(b);
        assert_eq!(merged.published, 2);
        assert_eq!(merged.auto_approved, 3);
        assert_eq!(merged.skipped, 1);
        assert_eq!(merged.errors, 1);
    }
}
