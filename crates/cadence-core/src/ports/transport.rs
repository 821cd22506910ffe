//! Publish transport port - the remote call behind every publisher.
//!
//! Publishers format and validate; the transport only delivers. Swapping the
//! simulated transport for a real API client does not touch the orchestrator.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Platform;

/// Formatted content handed to the transport.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    pub post_id: Uuid,
    /// Target platforms. Publishers send one; the sweep sends the whole list.
    pub platforms: &'a [Platform],
    pub text: &'a str,
}

/// Acknowledgement returned by the remote side.
#[derive(Debug, Clone)]
pub struct TransportReceipt {
    pub platform_post_id: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Remote publish failed: {0}")]
    Remote(String),

    #[error("Transport not configured: {0}")]
    NotConfigured(String),
}

#[async_trait]
pub trait PublishTransport: Send + Sync {
    async fn send(&self, delivery: Delivery<'_>) -> Result<TransportReceipt, TransportError>;

    /// Whether credentials/settings for a real call are present.
    fn is_configured(&self) -> bool;
}
