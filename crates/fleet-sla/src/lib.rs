//! Domain crate for the fleet-maintenance SLA calculator.
//!
//! The computational core lives in [`workflows::analysis`]: business-day
//! counting, per-service SLA thresholds, pro-rated discounts, and scenario
//! ranking, all pure functions over value types. Around it sit the audit
//! record surface, account lifecycle, support tickets, and the seams for the
//! external document, hashing, and mail collaborators.

pub mod assistant;
pub mod config;
pub mod error;
pub mod money;
pub mod notify;
pub mod telemetry;
pub mod workflows;
