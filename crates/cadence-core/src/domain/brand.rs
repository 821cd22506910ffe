use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Brand whose identity is attached to every post published on its behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub voice: Option<String>,
    /// Contact that receives approval requests (e.g. a WhatsApp number).
    pub approver_contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    pub fn new(
        tenant_id: Uuid,
        name: String,
        voice: Option<String>,
        approver_contact: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            voice,
            approver_contact,
            created_at: now,
            updated_at: now,
        }
    }
}
