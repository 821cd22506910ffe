//! SeaORM entities, one module per table.

pub mod approval_log;
pub mod brand;
pub mod enums;
pub mod post;
pub mod post_analytics;
pub mod schedule;
pub mod tenant;
pub mod user;
