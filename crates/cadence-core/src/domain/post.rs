use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Platform;
use crate::error::DomainError;

/// Lifecycle of a post from drafting to publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    PendingApproval,
    Approved,
    ChangeRequested,
    Rejected,
    Scheduled,
    Published,
    Failed,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::PendingApproval => "PENDING_APPROVAL",
            PostStatus::Approved => "APPROVED",
            PostStatus::ChangeRequested => "CHANGE_REQUESTED",
            PostStatus::Rejected => "REJECTED",
            PostStatus::Scheduled => "SCHEDULED",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Failed => "FAILED",
            PostStatus::Archived => "ARCHIVED",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `SCHEDULED -> SCHEDULED` is allowed so a dispatch can re-mark an
    /// already scheduled post as in flight.
    pub fn can_transition_to(self, next: PostStatus) -> bool {
        use PostStatus::*;

        matches!(
            (self, next),
            (Draft, PendingApproval)
                | (Draft, Archived)
                | (PendingApproval, Approved)
                | (PendingApproval, Scheduled)
                | (PendingApproval, ChangeRequested)
                | (PendingApproval, Rejected)
                | (ChangeRequested, Draft)
                | (Rejected, Draft)
                | (Rejected, Archived)
                | (Approved, Scheduled)
                | (Approved, Archived)
                | (Scheduled, Scheduled)
                | (Scheduled, Published)
                | (Scheduled, Failed)
                | (Failed, Scheduled)
                | (Failed, Archived)
                | (Published, Archived)
        )
    }

    /// Statuses from which a manual dispatch may start.
    pub fn is_dispatchable(self) -> bool {
        matches!(
            self,
            PostStatus::Approved | PostStatus::Scheduled | PostStatus::Failed
        )
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_ascii_uppercase()))
            .map_err(|_| format!("unknown post status: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Asset attached to a post (uploaded image or video).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    pub kind: MediaKind,
}

/// Structured post content as produced by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostContent {
    pub hook: String,
    pub body: String,
    pub hashtags: Vec<String>,
    pub platforms: Vec<Platform>,
    pub media: Vec<MediaAsset>,
}

impl PostContent {
    /// Target platforms without repeats, in first-seen order.
    pub fn target_platforms(&self) -> Vec<Platform> {
        let mut seen = Vec::with_capacity(self.platforms.len());
        for platform in &self.platforms {
            if !seen.contains(platform) {
                seen.push(*platform);
            }
        }
        seen
    }
}

/// A content item owned by a tenant and published to one or more platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub content: PostContent,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post.
    pub fn new(tenant_id: Uuid, brand_id: Uuid, title: String, content: PostContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            brand_id,
            title,
            content,
            status: PostStatus::Draft,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the post to `next`, rejecting transitions the lifecycle forbids.
    pub fn transition_to(&mut self, next: PostStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = Utc::now();
        if next == PostStatus::Published {
            self.published_at = Some(self.updated_at);
        }
        Ok(())
    }
}
