use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    Submitted,
    Approved,
    Rejected,
    ChangeRequested,
    Reopened,
    Archived,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Submitted => "SUBMITTED",
            ApprovalAction::Approved => "APPROVED",
            ApprovalAction::Rejected => "REJECTED",
            ApprovalAction::ChangeRequested => "CHANGE_REQUESTED",
            ApprovalAction::Reopened => "REOPENED",
            ApprovalAction::Archived => "ARCHIVED",
        }
    }
}

/// Audit trail entry for an approval decision on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalLog {
    pub id: Uuid,
    pub post_id: Uuid,
    pub tenant_id: Uuid,
    pub action: ApprovalAction,
    /// Acting user; `None` when the system acted (auto-approval).
    pub actor_id: Option<Uuid>,
    pub feedback: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ApprovalLog {
    pub fn new(
        post_id: Uuid,
        tenant_id: Uuid,
        action: ApprovalAction,
        actor_id: Option<Uuid>,
        feedback: Option<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            tenant_id,
            action,
            actor_id,
            feedback,
            metadata,
            created_at: Utc::now(),
        }
    }
}
