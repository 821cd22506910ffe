//! Approval notifier that only logs. Stands in until a messaging channel is wired up.

use async_trait::async_trait;

use cadence_core::domain::{Brand, Post};
use cadence_core::ports::{ApprovalNotifier, NotifyError};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingApprovalNotifier;

#[async_trait]
impl ApprovalNotifier for LoggingApprovalNotifier {
    async fn request_approval(&self, post: &Post, brand: &Brand) -> Result<(), NotifyError> {
        let Some(contact) = brand.approver_contact.as_deref() else {
            return Err(NotifyError::NoRecipient(brand.id));
        };

        tracing::info!(
            post_id = %post.id,
            brand = %brand.name,
            approver = %contact,
            title = %post.title,
            "Approval requested"
        );
        Ok(())
    }

    async fn auto_approved(&self, post: &Post) -> Result<(), NotifyError> {
        tracing::info!(post_id = %post.id, title = %post.title, "Approver notified of auto-approval");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::domain::PostContent;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_missing_contact_is_reported() {
        let brand = Brand::new(Uuid::new_v4(), "Acme".into(), None, None);
        let post = Post::new(brand.tenant_id, brand.id, "Hi".into(), PostContent::default());

        let result = LoggingApprovalNotifier.request_approval(&post, &brand).await;
        assert!(matches!(result, Err(NotifyError::NoRecipient(id)) if id == brand.id));
    }

    #[tokio::test]
    async fn test_contact_present_succeeds() {
        let brand = Brand::new(
            Uuid::new_v4(),
            "Acme".into(),
            None,
            Some("+15550100".into()),
        );
        let post = Post::new(brand.tenant_id, brand.id, "Hi".into(), PostContent::default());

        assert!(LoggingApprovalNotifier.request_approval(&post, &brand).await.is_ok());
    }
}
