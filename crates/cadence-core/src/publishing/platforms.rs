//! Per-platform publishers.

use std::sync::Arc;

use async_trait::async_trait;

use super::publisher::{
    character_limit_error, deliver, hashtag_line, join_sections, PublishPayload, PublishResult,
    Publisher, ValidationOutcome,
};
use crate::domain::{MediaKind, Platform};
use crate::ports::PublishTransport;

pub struct FacebookPublisher {
    transport: Arc<dyn PublishTransport>,
}

impl FacebookPublisher {
    pub const CHARACTER_LIMIT: usize = 63_206;
    pub const MAX_HASHTAGS: usize = 10;

    pub fn new(transport: Arc<dyn PublishTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Publisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn validate_content(&self, payload: &PublishPayload) -> ValidationOutcome {
        let text = self.format_content(payload);
        let errors = character_limit_error(self.platform(), &text, Self::CHARACTER_LIMIT)
            .into_iter()
            .collect();
        ValidationOutcome::from_errors(errors)
    }

    fn format_content(&self, payload: &PublishPayload) -> String {
        let tags = hashtag_line(&payload.hashtags, Self::MAX_HASHTAGS);
        join_sections(&[&payload.hook, &payload.body, &tags], "\n\n")
    }

    async fn publish(&self, payload: &PublishPayload) -> PublishResult {
        let text = self.format_content(payload);
        deliver(self.transport.as_ref(), self.platform(), payload.post_id, &text).await
    }

    fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }
}

/// Captions put hashtags below a dotted spacer, away from the copy.
pub struct InstagramPublisher {
    transport: Arc<dyn PublishTransport>,
}

impl InstagramPublisher {
    pub const CHARACTER_LIMIT: usize = 2_200;
    pub const MAX_HASHTAGS: usize = 30;

    pub fn new(transport: Arc<dyn PublishTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Publisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn validate_content(&self, payload: &PublishPayload) -> ValidationOutcome {
        let mut errors = Vec::new();
        if payload.count_media(MediaKind::Image) == 0 {
            errors.push("Instagram requires at least one image".to_string());
        }
        let text = self.format_content(payload);
        errors.extend(character_limit_error(
            self.platform(),
            &text,
            Self::CHARACTER_LIMIT,
        ));
        ValidationOutcome::from_errors(errors)
    }

    fn format_content(&self, payload: &PublishPayload) -> String {
        let caption = join_sections(&[&payload.hook, &payload.body], "\n\n");
        let tags = hashtag_line(&payload.hashtags, Self::MAX_HASHTAGS);
        if tags.is_empty() {
            caption
        } else {
            join_sections(&[&caption, ".\n.\n.", &tags], "\n")
        }
    }

    async fn publish(&self, payload: &PublishPayload) -> PublishResult {
        let text = self.format_content(payload);
        deliver(self.transport.as_ref(), self.platform(), payload.post_id, &text).await
    }

    fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }
}

/// Short-form: hashtags ride on the last line of the body.
pub struct XPublisher {
    transport: Arc<dyn PublishTransport>,
}

impl XPublisher {
    pub const CHARACTER_LIMIT: usize = 280;
    pub const MAX_HASHTAGS: usize = 3;

    pub fn new(transport: Arc<dyn PublishTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Publisher for XPublisher {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn validate_content(&self, payload: &PublishPayload) -> ValidationOutcome {
        let text = self.format_content(payload);
        let errors = character_limit_error(self.platform(), &text, Self::CHARACTER_LIMIT)
            .into_iter()
            .collect();
        ValidationOutcome::from_errors(errors)
    }

    fn format_content(&self, payload: &PublishPayload) -> String {
        let tags = hashtag_line(&payload.hashtags, Self::MAX_HASHTAGS);
        let tail = join_sections(&[&payload.body, &tags], " ");
        join_sections(&[&payload.hook, &tail], "\n\n")
    }

    async fn publish(&self, payload: &PublishPayload) -> PublishResult {
        let text = self.format_content(payload);
        deliver(self.transport.as_ref(), self.platform(), payload.post_id, &text).await
    }

    fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }
}

pub struct LinkedInPublisher {
    transport: Arc<dyn PublishTransport>,
}

impl LinkedInPublisher {
    pub const CHARACTER_LIMIT: usize = 3_000;
    pub const MAX_HASHTAGS: usize = 5;

    pub fn new(transport: Arc<dyn PublishTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Publisher for LinkedInPublisher {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    fn validate_content(&self, payload: &PublishPayload) -> ValidationOutcome {
        let text = self.format_content(payload);
        let errors = character_limit_error(self.platform(), &text, Self::CHARACTER_LIMIT)
            .into_iter()
            .collect();
        ValidationOutcome::from_errors(errors)
    }

    fn format_content(&self, payload: &PublishPayload) -> String {
        let tags = hashtag_line(&payload.hashtags, Self::MAX_HASHTAGS);
        join_sections(&[&payload.hook, &payload.body, &tags], "\n\n")
    }

    async fn publish(&self, payload: &PublishPayload) -> PublishResult {
        let text = self.format_content(payload);
        deliver(self.transport.as_ref(), self.platform(), payload.post_id, &text).await
    }

    fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }
}

/// Video captions lead with the hook and hashtags; the body follows.
pub struct TikTokPublisher {
    transport: Arc<dyn PublishTransport>,
}

impl TikTokPublisher {
    pub const CHARACTER_LIMIT: usize = 2_200;
    pub const MAX_HASHTAGS: usize = 5;

    pub fn new(transport: Arc<dyn PublishTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Publisher for TikTokPublisher {
    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    fn validate_content(&self, payload: &PublishPayload) -> ValidationOutcome {
        let mut errors = Vec::new();
        if payload.count_media(MediaKind::Video) == 0 {
            errors.push("TikTok requires a video".to_string());
        }
        let text = self.format_content(payload);
        errors.extend(character_limit_error(
            self.platform(),
            &text,
            Self::CHARACTER_LIMIT,
        ));
        ValidationOutcome::from_errors(errors)
    }

    fn format_content(&self, payload: &PublishPayload) -> String {
        let tags = hashtag_line(&payload.hashtags, Self::MAX_HASHTAGS);
        let headline = join_sections(&[&payload.hook, &tags], " ");
        join_sections(&[&headline, &payload.body], "\n\n")
    }

    async fn publish(&self, payload: &PublishPayload) -> PublishResult {
        let text = self.format_content(payload);
        deliver(self.transport.as_ref(), self.platform(), payload.post_id, &text).await
    }

    fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaAsset;
    use crate::ports::{Delivery, TransportError, TransportReceipt};
    use crate::publishing::BrandIdentity;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PublishTransport for RecordingTransport {
        async fn send(&self, delivery: Delivery<'_>) -> Result<TransportReceipt, TransportError> {
            self.sent.lock().unwrap().push(delivery.text.to_string());
            Ok(TransportReceipt {
                platform_post_id: format!("{}_1", delivery.platforms[0].as_str().to_lowercase()),
                metadata: serde_json::json!({}),
            })
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn payload(body: &str) -> PublishPayload {
        PublishPayload {
            post_id: Uuid::new_v4(),
            title: "Launch".into(),
            hook: "Big news".into(),
            body: body.into(),
            hashtags: vec!["launch".into(), "#rust".into(), "cadence".into(), "ship".into()],
            media: vec![],
            brand: BrandIdentity {
                id: Uuid::new_v4(),
                name: "Acme".into(),
                voice: None,
            },
            scheduled_at: None,
        }
    }

    fn transport() -> Arc<RecordingTransport> {
        Arc::new(RecordingTransport::default())
    }

    #[test]
    fn test_x_rejects_long_body() {
        let publisher = XPublisher::new(transport());
        let outcome = publisher.validate_content(&payload(&"a".repeat(300)));

        assert!(!outcome.valid);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("X character limit of 280 exceeded"));
    }

    #[test]
    fn test_x_caps_hashtags_at_three() {
        let publisher = XPublisher::new(transport());
        let text = publisher.format_content(&payload("short"));

        assert_eq!(text, "Big news\n\nshort #launch #rust #cadence");
    }

    #[test]
    fn test_instagram_requires_image() {
        let publisher = InstagramPublisher::new(transport());
        let mut p = payload("caption");
        assert_eq!(
            publisher.validate_content(&p).errors,
            vec!["Instagram requires at least one image".to_string()]
        );

        p.media.push(MediaAsset {
            url: "https://cdn.example.com/a.jpg".into(),
            kind: MediaKind::Image,
        });
        assert!(publisher.validate_content(&p).valid);
    }

    #[test]
    fn test_instagram_separates_hashtags() {
        let publisher = InstagramPublisher::new(transport());
        let text = publisher.format_content(&payload("caption"));

        assert!(text.starts_with("Big news\n\ncaption\n.\n.\n.\n#launch"));
    }

    #[test]
    fn test_tiktok_requires_video() {
        let publisher = TikTokPublisher::new(transport());
        let mut p = payload("clip");
        p.media.push(MediaAsset {
            url: "https://cdn.example.com/a.jpg".into(),
            kind: MediaKind::Image,
        });
        assert_eq!(
            publisher.validate_content(&p).errors,
            vec!["TikTok requires a video".to_string()]
        );

        p.media.push(MediaAsset {
            url: "https://cdn.example.com/a.mp4".into(),
            kind: MediaKind::Video,
        });
        assert!(publisher.validate_content(&p).valid);
    }

    #[test]
    fn test_linkedin_limit_reports_lengths() {
        let publisher = LinkedInPublisher::new(transport());
        let outcome = publisher.validate_content(&payload(&"b".repeat(3_100)));

        assert!(!outcome.valid);
        assert!(outcome.errors[0].starts_with("LinkedIn character limit of 3000 exceeded"));
    }

    #[test]
    fn test_facebook_accepts_long_text() {
        let publisher = FacebookPublisher::new(transport());
        assert!(publisher.validate_content(&payload(&"c".repeat(5_000))).valid);
    }

    #[tokio::test]
    async fn test_publish_sends_formatted_text() {
        let transport = transport();
        let publisher = LinkedInPublisher::new(transport.clone());
        let p = payload("body");

        let result = publisher.publish(&p).await;

        assert!(result.success);
        assert_eq!(result.platform_post_id.as_deref(), Some("linkedin_1"));
        assert!(result.published_at.is_some());
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[publisher.format_content(&p)]);
    }
}
