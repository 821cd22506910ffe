//! Data Transfer Objects - request/response types for the API.
//!
//! Domain enums (statuses, platforms, roles) travel as their upper-case wire
//! strings so this crate stays free of the domain crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new tenant together with its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub tenant_name: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
    #[serde(default)]
    pub voice: Option<String>,
    /// Where approval requests are delivered (phone number, address, ...).
    #[serde(default)]
    pub approver_contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAssetDto {
    pub url: String,
    /// `image` or `video`.
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub brand_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Platform identifiers, e.g. `["X", "LINKEDIN"]`.
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaAssetDto>,
}

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<String>,
}

/// Body of approve, reject and request-changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalFeedbackRequest {
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePostRequest {
    pub run_at: DateTime<Utc>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Answer of `POST /analytics/brand/{id}/pull`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsPullResponse {
    pub brand_id: Uuid,
    /// `true` when the pull went to the job queue instead of running inline.
    pub queued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_created: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherInfo {
    pub platform: String,
    pub display_name: String,
    pub configured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishersResponse {
    pub supported: Vec<String>,
    pub publishers: Vec<PublisherInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishHealthResponse {
    pub healthy: bool,
    pub total: usize,
    pub configured: usize,
    pub unconfigured: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_post_defaults() {
        let request: CreatePostRequest = serde_json::from_value(json!({
            "brand_id": Uuid::nil(),
            "title": "Launch",
        }))
        .unwrap();

        assert!(request.platforms.is_empty());
        assert!(request.hook.is_empty());
        assert!(request.media.is_empty());
    }

    #[test]
    fn test_schedule_request_defaults_to_utc() {
        let request: SchedulePostRequest =
            serde_json::from_value(json!({ "run_at": "2030-01-01T09:00:00Z" })).unwrap();
        assert_eq!(request.timezone, "UTC");
    }

    #[test]
    fn test_pull_response_skips_absent_fields() {
        let response = AnalyticsPullResponse {
            brand_id: Uuid::nil(),
            queued: true,
            job_id: Some("job-1".to_string()),
            records_created: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("records_created").is_none());
        assert_eq!(value["queued"], true);
    }
}
