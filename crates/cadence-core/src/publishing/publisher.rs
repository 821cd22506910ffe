//! Publisher contract and the payload/result types shared by all platforms.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Brand, MediaAsset, MediaKind, Platform, Post};
use crate::ports::{Delivery, PublishTransport};

/// Brand details carried along with the content.
#[derive(Debug, Clone, Serialize)]
pub struct BrandIdentity {
    pub id: Uuid,
    pub name: String,
    pub voice: Option<String>,
}

/// Everything a publisher needs to render and send one post.
#[derive(Debug, Clone, Serialize)]
pub struct PublishPayload {
    pub post_id: Uuid,
    pub title: String,
    pub hook: String,
    pub body: String,
    pub hashtags: Vec<String>,
    pub media: Vec<MediaAsset>,
    pub brand: BrandIdentity,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl PublishPayload {
    /// Build the payload for `post`. A missing brand falls back to the bare id.
    pub fn from_post(
        post: &Post,
        brand: Option<&Brand>,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        let brand = match brand {
            Some(brand) => BrandIdentity {
                id: brand.id,
                name: brand.name.clone(),
                voice: brand.voice.clone(),
            },
            None => BrandIdentity {
                id: post.brand_id,
                name: String::new(),
                voice: None,
            },
        };

        Self {
            post_id: post.id,
            title: post.title.clone(),
            hook: post.content.hook.clone(),
            body: post.content.body.clone(),
            hashtags: post.content.hashtags.clone(),
            media: post.content.media.clone(),
            brand,
            scheduled_at,
        }
    }

    pub fn count_media(&self, kind: MediaKind) -> usize {
        self.media.iter().filter(|m| m.kind == kind).count()
    }
}

/// Result of `Publisher::validate_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Outcome of a single publish call. Failures are values, not errors.
#[derive(Debug, Clone, Serialize)]
pub struct PublishResult {
    pub success: bool,
    pub platform_post_id: Option<String>,
    pub error: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub published_at: Option<DateTime<Utc>>,
}

impl PublishResult {
    pub fn succeeded(platform_post_id: String, metadata: serde_json::Value) -> Self {
        Self {
            success: true,
            platform_post_id: Some(platform_post_id),
            error: None,
            metadata: Some(metadata),
            published_at: Some(Utc::now()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            platform_post_id: None,
            error: Some(error.into()),
            metadata: None,
            published_at: None,
        }
    }
}

/// One implementation per platform, so formatting and validation rules stay
/// local to the platform that needs them.
#[async_trait]
pub trait Publisher: Send + Sync {
    fn platform(&self) -> Platform;

    /// Check platform constraints. Pure; safe to call before every attempt.
    fn validate_content(&self, payload: &PublishPayload) -> ValidationOutcome;

    /// Render the final post text.
    fn format_content(&self, payload: &PublishPayload) -> String;

    /// Send the formatted content. Expected failures come back as
    /// `success == false`.
    async fn publish(&self, payload: &PublishPayload) -> PublishResult;

    fn is_configured(&self) -> bool;
}

/// Normalize hashtags to `#tag` form, drop blanks and keep at most `cap`.
pub(crate) fn hashtag_line(hashtags: &[String], cap: usize) -> String {
    hashtags
        .iter()
        .map(|tag| tag.trim().trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .take(cap)
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join the non-empty sections with `separator`.
pub(crate) fn join_sections(sections: &[&str], separator: &str) -> String {
    sections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

pub(crate) fn character_limit_error(platform: Platform, text: &str, limit: usize) -> Option<String> {
    let length = text.chars().count();
    (length > limit).then(|| {
        format!(
            "{} character limit of {} exceeded (got {} characters)",
            platform.display_name(),
            limit,
            length
        )
    })
}

/// Hand formatted text to the transport and fold the answer into a result.
pub(crate) async fn deliver(
    transport: &dyn PublishTransport,
    platform: Platform,
    post_id: Uuid,
    text: &str,
) -> PublishResult {
    let platforms = [platform];
    let delivery = Delivery {
        post_id,
        platforms: &platforms,
        text,
    };

    match transport.send(delivery).await {
        Ok(receipt) => {
            tracing::debug!(
                post_id = %post_id,
                platform = %platform,
                platform_post_id = %receipt.platform_post_id,
                "Delivered post"
            );
            PublishResult::succeeded(receipt.platform_post_id, receipt.metadata)
        }
        Err(e) => PublishResult::failed(e.to_string()),
    }
}
