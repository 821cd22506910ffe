use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "PENDING",
            ScheduleStatus::Completed => "COMPLETED",
            ScheduleStatus::Failed => "FAILED",
            ScheduleStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target publish time for a post. At most one exists per post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub post_id: Uuid,
    pub tenant_id: Uuid,
    pub run_at: DateTime<Utc>,
    pub timezone: String,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Create a pending schedule. `run_at` must be strictly after `now`.
    pub fn new(
        post_id: Uuid,
        tenant_id: Uuid,
        run_at: DateTime<Utc>,
        timezone: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::validate_run_at(run_at, now)?;

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            tenant_id,
            run_at,
            timezone,
            status: ScheduleStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-arm a finished or cancelled schedule for a new run time.
    pub fn rearm(
        &mut self,
        run_at: DateTime<Utc>,
        timezone: String,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status == ScheduleStatus::Pending {
            return Err(DomainError::Duplicate(format!(
                "post {} already has a pending schedule",
                self.post_id
            )));
        }
        Self::validate_run_at(run_at, now)?;

        self.run_at = run_at;
        self.timezone = timezone;
        self.status = ScheduleStatus::Pending;
        self.updated_at = now;
        Ok(())
    }

    fn validate_run_at(run_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), DomainError> {
        if run_at <= now {
            return Err(DomainError::Validation(
                "run_at must be in the future".to_string(),
            ));
        }
        Ok(())
    }
}
