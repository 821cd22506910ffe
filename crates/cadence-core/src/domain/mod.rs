//! Domain entities - the core business objects.

mod analytics;
mod approval;
mod brand;
mod platform;
mod post;
mod schedule;
mod tenant;
mod user;

pub use analytics::{EngagementMetrics, PostAnalytics};
pub use approval::{ApprovalAction, ApprovalLog};
pub use brand::Brand;
pub use platform::Platform;
pub use post::{MediaAsset, MediaKind, Post, PostContent, PostStatus};
pub use schedule::{Schedule, ScheduleStatus};
pub use tenant::Tenant;
pub use user::{Role, User};
