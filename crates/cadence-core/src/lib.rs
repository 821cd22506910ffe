//! # Cadence Core
//!
//! The domain layer of Cadence: entities, ports and the publishing,
//! scheduling and approval workflows. Infrastructure lives in `cadence-infra`
//! and is reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod publishing;
pub mod services;

pub use error::{DomainError, RepoError};
