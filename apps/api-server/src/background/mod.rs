//! Background work: the cron sweep and the job queue worker.

mod jobs;
#[cfg(feature = "scheduler")]
mod scheduler;

pub use jobs::start_job_worker;
#[cfg(feature = "scheduler")]
pub use scheduler::start_sweep_schedule;

use crate::config::parse_flag;

/// Every minute, at second zero.
pub const SWEEP_SCHEDULE: &str = "0 * * * * *";

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Six-field cron expression of the sweep.
    pub sweep_schedule: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_schedule: SWEEP_SCHEDULE.to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: parse_flag("SCHEDULER_ENABLED", true),
            ..Default::default()
        }
    }
}
