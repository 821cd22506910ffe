#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cadence_core::domain::{
    Brand, MediaAsset, MediaKind, Platform, Post, PostContent, PostStatus, Schedule,
    ScheduleStatus,
};
use cadence_core::error::RepoError;
use cadence_core::ports::{
    AnalyticsRepository, ApprovalNotifier, BaseRepository, Delivery, NotifyError,
    PublishTransport, Repositories, ScheduleRepository, TransportError, TransportReceipt,
};
use cadence_core::domain::PostAnalytics;
use cadence_core::publishing::{PublisherFactory, PublishingConfig, PublishingService};
use cadence_infra::in_memory_repositories;

/// Transport whose failures are scripted per platform and per call.
#[derive(Default)]
pub struct ScriptedTransport {
    failing_platforms: HashSet<Platform>,
    /// Number of leading calls that fail regardless of platform.
    fail_first: usize,
    calls: AtomicUsize,
    sent: Mutex<Vec<(Vec<Platform>, String)>>,
}

impl ScriptedTransport {
    pub fn reliable() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_for(platforms: &[Platform]) -> Arc<Self> {
        Arc::new(Self {
            failing_platforms: platforms.iter().copied().collect(),
            ..Default::default()
        })
    }

    pub fn failing_first(n: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_first: n,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(Vec<Platform>, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishTransport for ScriptedTransport {
    async fn send(&self, delivery: Delivery<'_>) -> Result<TransportReceipt, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((delivery.platforms.to_vec(), delivery.text.to_string()));

        if call < self.fail_first
            || delivery
                .platforms
                .iter()
                .any(|p| self.failing_platforms.contains(p))
        {
            return Err(TransportError::Remote("scripted failure".into()));
        }

        Ok(TransportReceipt {
            platform_post_id: format!("scripted_{call}"),
            metadata: serde_json::json!({ "call": call }),
        })
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Analytics store that rejects every write.
pub struct BrokenAnalytics;

#[async_trait]
impl AnalyticsRepository for BrokenAnalytics {
    async fn append(&self, _: PostAnalytics) -> Result<PostAnalytics, RepoError> {
        Err(RepoError::Connection("analytics database unavailable".into()))
    }

    async fn find_by_post(&self, _: Uuid) -> Result<Vec<PostAnalytics>, RepoError> {
        Ok(Vec::new())
    }
}

/// Schedule store whose first `n` status writes fail; everything else is
/// delegated to the wrapped store.
pub struct FlakySchedules {
    inner: Arc<dyn ScheduleRepository>,
    failures_left: AtomicUsize,
}

impl FlakySchedules {
    pub fn failing_first(inner: Arc<dyn ScheduleRepository>, n: usize) -> Arc<Self> {
        Arc::new(Self {
            inner,
            failures_left: AtomicUsize::new(n),
        })
    }
}

#[async_trait]
impl BaseRepository<Schedule, Uuid> for FlakySchedules {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Schedule>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, entity: Schedule) -> Result<Schedule, RepoError> {
        self.inner.create(entity).await
    }

    async fn update(&self, entity: Schedule) -> Result<Schedule, RepoError> {
        self.inner.update(entity).await
    }
}

#[async_trait]
impl ScheduleRepository for FlakySchedules {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Option<Schedule>, RepoError> {
        self.inner.find_by_post(post_id).await
    }

    async fn update_status(&self, id: Uuid, status: ScheduleStatus) -> Result<(), RepoError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RepoError::Connection("schedule store unavailable".into()));
        }
        self.inner.update_status(id, status).await
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError> {
        self.inner.find_due(now, tenant_id).await
    }

    async fn find_pending_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError> {
        self.inner.find_pending_between(from, to, tenant_id).await
    }

    async fn count_pending(&self, tenant_id: Uuid) -> Result<u64, RepoError> {
        self.inner.count_pending(tenant_id).await
    }
}

/// Notifier that records which posts it was told about.
#[derive(Default)]
pub struct RecordingNotifier {
    pub requested: Mutex<Vec<Uuid>>,
    pub auto_approved: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl ApprovalNotifier for RecordingNotifier {
    async fn request_approval(&self, post: &Post, _: &Brand) -> Result<(), NotifyError> {
        self.requested.lock().unwrap().push(post.id);
        Ok(())
    }

    async fn auto_approved(&self, post: &Post) -> Result<(), NotifyError> {
        self.auto_approved.lock().unwrap().push(post.id);
        Ok(())
    }
}

pub fn repos() -> Repositories {
    in_memory_repositories()
}

pub fn fast_publishing(repos: &Repositories, transport: Arc<ScriptedTransport>) -> PublishingService {
    PublishingService::new(
        repos.clone(),
        Arc::new(PublisherFactory::new(transport)),
        PublishingConfig {
            max_retries: 3,
            retry_delay: Duration::ZERO,
        },
    )
}

pub async fn brand(repos: &Repositories, tenant_id: Uuid) -> Brand {
    repos
        .brands
        .create(Brand::new(
            tenant_id,
            "Acme".into(),
            Some("Friendly".into()),
            Some("+15550100".into()),
        ))
        .await
        .unwrap()
}

pub fn content(platforms: &[Platform]) -> PostContent {
    PostContent {
        hook: "Big news".into(),
        body: "We shipped it.".into(),
        hashtags: vec!["launch".into()],
        platforms: platforms.to_vec(),
        media: Vec::new(),
    }
}

pub fn with_image(mut content: PostContent) -> PostContent {
    content.media.push(MediaAsset {
        url: "https://cdn.example.com/launch.jpg".into(),
        kind: MediaKind::Image,
    });
    content
}

pub async fn post(
    repos: &Repositories,
    brand: &Brand,
    content: PostContent,
    status: PostStatus,
) -> Post {
    let mut post = Post::new(brand.tenant_id, brand.id, "Launch".into(), content);
    post.status = status;
    repos.posts.create(post).await.unwrap()
}

pub async fn reload(repos: &Repositories, post_id: Uuid) -> Post {
    repos.posts.find_by_id(post_id).await.unwrap().unwrap()
}
