//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod job_queue;
mod notifier;
mod rate_limit;
mod repository;
mod transport;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use job_queue::{Job, JobHandler, JobQueue, JobQueueError, JobResult, QueueStats};
pub use notifier::{ApprovalNotifier, NotifyError};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    AnalyticsRepository, ApprovalLogRepository, BaseRepository, BrandRepository,
    PostRepository, Repositories, ScheduleRepository, StatusCount, TenantRepository,
    UserRepository,
};
pub use transport::{Delivery, PublishTransport, TransportError, TransportReceipt};
