//! Human approval workflow. Every action moves the post through its
//! lifecycle and leaves an entry in the approval log.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::{ApprovalAction, ApprovalLog, Post, PostStatus, ScheduleStatus};
use crate::error::DomainError;
use crate::ports::{ApprovalNotifier, Repositories};

pub struct ApprovalService {
    repos: Repositories,
    notifier: Arc<dyn ApprovalNotifier>,
}

impl ApprovalService {
    pub fn new(repos: Repositories, notifier: Arc<dyn ApprovalNotifier>) -> Self {
        Self { repos, notifier }
    }

    /// DRAFT -> PENDING_APPROVAL, then ask the brand's approver.
    pub async fn submit(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Post, DomainError> {
        let post = self
            .apply(
                post_id,
                tenant_id,
                PostStatus::PendingApproval,
                ApprovalAction::Submitted,
                actor_id,
                None,
            )
            .await?;

        match self
            .repos
            .brands
            .find_for_tenant(post.brand_id, tenant_id)
            .await
        {
            Ok(Some(brand)) => {
                if let Err(e) = self.notifier.request_approval(&post, &brand).await {
                    tracing::warn!(post_id = %post.id, error = %e, "Approval request not delivered");
                }
            }
            Ok(None) => {
                tracing::warn!(post_id = %post.id, brand_id = %post.brand_id, "Brand missing, no approval request sent");
            }
            Err(e) => {
                tracing::warn!(post_id = %post.id, error = %e, "Brand lookup failed, no approval request sent");
            }
        }

        Ok(post)
    }

    /// PENDING_APPROVAL -> SCHEDULED when a pending schedule exists,
    /// otherwise -> APPROVED.
    pub async fn approve(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        actor_id: Uuid,
        feedback: Option<String>,
    ) -> Result<Post, DomainError> {
        let has_pending_schedule = self
            .repos
            .schedules
            .find_by_post(post_id)
            .await?
            .is_some_and(|s| s.tenant_id == tenant_id && s.status == ScheduleStatus::Pending);
        let target = if has_pending_schedule {
            PostStatus::Scheduled
        } else {
            PostStatus::Approved
        };

        self.apply(
            post_id,
            tenant_id,
            target,
            ApprovalAction::Approved,
            actor_id,
            normalize(feedback),
        )
        .await
    }

    pub async fn reject(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        actor_id: Uuid,
        feedback: Option<String>,
    ) -> Result<Post, DomainError> {
        self.apply(
            post_id,
            tenant_id,
            PostStatus::Rejected,
            ApprovalAction::Rejected,
            actor_id,
            normalize(feedback),
        )
        .await
    }

    /// Send the post back to its author. Feedback is mandatory.
    pub async fn request_changes(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        actor_id: Uuid,
        feedback: String,
    ) -> Result<Post, DomainError> {
        let feedback = normalize(Some(feedback)).ok_or_else(|| {
            DomainError::Validation("feedback is required when requesting changes".to_string())
        })?;

        self.apply(
            post_id,
            tenant_id,
            PostStatus::ChangeRequested,
            ApprovalAction::ChangeRequested,
            actor_id,
            Some(feedback),
        )
        .await
    }

    /// REJECTED or CHANGE_REQUESTED -> DRAFT.
    pub async fn reopen(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Post, DomainError> {
        self.apply(
            post_id,
            tenant_id,
            PostStatus::Draft,
            ApprovalAction::Reopened,
            actor_id,
            None,
        )
        .await
    }

    pub async fn archive(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Post, DomainError> {
        self.apply(
            post_id,
            tenant_id,
            PostStatus::Archived,
            ApprovalAction::Archived,
            actor_id,
            None,
        )
        .await
    }

    /// Approval trail of a post, oldest first.
    pub async fn history(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Vec<ApprovalLog>, DomainError> {
        let post = self.load(post_id, tenant_id).await?;
        let mut logs = self.repos.approvals.find_by_post(post.id).await?;
        logs.sort_by_key(|log| log.created_at);
        Ok(logs)
    }

    async fn load(&self, post_id: Uuid, tenant_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_for_tenant(post_id, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn apply(
        &self,
        post_id: Uuid,
        tenant_id: Uuid,
        target: PostStatus,
        action: ApprovalAction,
        actor_id: Uuid,
        feedback: Option<String>,
    ) -> Result<Post, DomainError> {
        let mut post = self.load(post_id, tenant_id).await?;
        let from = post.status;
        post.transition_to(target)?;

        self.repos
            .posts
            .update_status(post.id, post.status, None)
            .await?;
        self.repos
            .approvals
            .append(ApprovalLog::new(
                post.id,
                tenant_id,
                action,
                Some(actor_id),
                feedback,
                json!({ "from": from, "to": target }),
            ))
            .await?;

        tracing::info!(
            post_id = %post.id,
            action = action.as_str(),
            from = %from,
            to = %target,
            "Approval action recorded"
        );
        Ok(post)
    }
}

fn normalize(feedback: Option<String>) -> Option<String> {
    feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
}
