//! Persistence: Postgres repositories, in-memory stores and connection management.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{
    DatabaseConfig, DatabaseConnections, NamedConnection, SecondaryDbConfig, ANALYTICS_DB,
};
pub use memory::{
    in_memory_repositories, InMemoryAnalyticsRepository, InMemoryApprovalLogRepository,
    InMemoryBrandRepository, InMemoryPostRepository, InMemoryScheduleRepository,
    InMemoryTenantRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAnalyticsRepository, PostgresApprovalLogRepository, PostgresBrandRepository,
    PostgresPostRepository, PostgresScheduleRepository, PostgresTenantRepository,
    PostgresUserRepository,
};
