//! Publish transports and approval notifiers.

mod notifier;
mod simulated;

pub use notifier::LoggingApprovalNotifier;
pub use simulated::{SimulatedTransport, SimulatedTransportConfig};
