//! Multi-platform publishing.

mod factory;
mod platforms;
mod publisher;
mod service;

pub use factory::{PublisherFactory, PublisherStatus};
pub use platforms::{
    FacebookPublisher, InstagramPublisher, LinkedInPublisher, TikTokPublisher, XPublisher,
};
pub use publisher::{BrandIdentity, PublishPayload, PublishResult, Publisher, ValidationOutcome};
pub use service::{
    DispatchResult, PlatformDispatchOutcome, PublishStatus, PublishingConfig, PublishingService,
};
