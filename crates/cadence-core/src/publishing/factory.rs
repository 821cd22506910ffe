//! Registry mapping each platform to its publisher.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::platforms::{
    FacebookPublisher, InstagramPublisher, LinkedInPublisher, TikTokPublisher, XPublisher,
};
use super::publisher::Publisher;
use crate::domain::Platform;
use crate::error::DomainError;
use crate::ports::PublishTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublisherStatus {
    pub platform: Platform,
    pub configured: bool,
}

pub struct PublisherFactory {
    publishers: BTreeMap<Platform, Arc<dyn Publisher>>,
}

impl PublisherFactory {
    /// Register the publisher of every supported platform over one transport.
    pub fn new(transport: Arc<dyn PublishTransport>) -> Self {
        Self::with_publishers([
            Arc::new(FacebookPublisher::new(transport.clone())) as Arc<dyn Publisher>,
            Arc::new(InstagramPublisher::new(transport.clone())),
            Arc::new(XPublisher::new(transport.clone())),
            Arc::new(LinkedInPublisher::new(transport.clone())),
            Arc::new(TikTokPublisher::new(transport)),
        ])
    }

    /// Build from an explicit set. A later publisher replaces an earlier one
    /// for the same platform.
    pub fn with_publishers(publishers: impl IntoIterator<Item = Arc<dyn Publisher>>) -> Self {
        let publishers = publishers
            .into_iter()
            .map(|p| (p.platform(), p))
            .collect();
        Self { publishers }
    }

    pub fn create_publisher(&self, platform: Platform) -> Result<Arc<dyn Publisher>, DomainError> {
        self.publishers
            .get(&platform)
            .cloned()
            .ok_or(DomainError::UnsupportedPlatform(platform))
    }

    pub fn supported_platforms(&self) -> Vec<Platform> {
        self.publishers.keys().copied().collect()
    }

    pub fn configured_publishers(&self) -> Vec<PublisherStatus> {
        self.publishers
            .values()
            .map(|p| PublisherStatus {
                platform: p.platform(),
                configured: p.is_configured(),
            })
            .collect()
    }
}
