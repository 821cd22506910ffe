//! # Cadence Infrastructure
//!
//! Adapters for the ports defined in `cadence-core`: Postgres and in-memory
//! repositories, the simulated publish transport, job queues, auth and rate
//! limiting.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor
//! - `redis` - Redis-backed job queue

pub mod database;
pub mod jobs;
pub mod publishing;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::{in_memory_repositories, DatabaseConfig, DatabaseConnections};
pub use jobs::{InMemoryJobQueue, InMemoryJobQueueConfig};
pub use publishing::{LoggingApprovalNotifier, SimulatedTransport, SimulatedTransportConfig};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
pub use jobs::{RedisConfig, RedisJobQueue, RedisJobQueueConfig};
