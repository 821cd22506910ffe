//! Workflow services built on the repository and transport ports.

mod analytics;
mod approval;
mod scheduling;

pub use analytics::{
    AnalyticsPullReport, AnalyticsPullRequest, AnalyticsService, ANALYTICS_PULL_JOB,
};
pub use approval::ApprovalService;
pub use scheduling::{SchedulingService, SchedulingStatus, SweepConfig, SweepReport};
