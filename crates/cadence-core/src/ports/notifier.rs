//! Approval notification port.
//!
//! Delivery (WhatsApp, e-mail, ...) and any session state it needs belong to
//! the implementation; the workflow only asks for a message to go out.

use async_trait::async_trait;

use crate::domain::{Brand, Post};

#[async_trait]
pub trait ApprovalNotifier: Send + Sync {
    /// Ask the brand's approver to review `post`.
    async fn request_approval(&self, post: &Post, brand: &Brand) -> Result<(), NotifyError>;

    /// Tell the approver a post went ahead without an answer.
    async fn auto_approved(&self, post: &Post) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("No approver contact configured for brand {0}")]
    NoRecipient(uuid::Uuid),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}
