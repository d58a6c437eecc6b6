//! The classification engine.
//!
//! Pure, synchronous functions over a read-only [`Topology`](crate::models::Topology):
//! - [`classify`] - per-subnet egress classification
//! - [`readiness`] - per-VNet readiness rollup and redundancy warning
//! - [`overlap`] - cross-subscription CIDR overlap detection
//! - [`assemble`] - combination into one report-ready result
//!
//! The engine holds no state between runs and performs no I/O; it is safe
//! to call concurrently on distinct topology snapshots.

pub mod assemble;
pub mod classify;
pub mod overlap;
pub mod readiness;

// Re-export the main entry points
pub use assemble::{assemble, AssessmentResult, SubnetAssessment, Summary, VnetAssessment};
pub use classify::{classify, RiskLevel, SubnetClassification};
pub use overlap::{find_overlaps, log_overlaps, OverlapPair};
pub use readiness::{aggregate, insufficient_route_table_redundancy, VnetReadiness};
