//! Performance metrics per reporting window.
//!
//! - [`window`]: reporting windows, the cache key.
//! - [`record`]: per-security results and the figures read from them.
//! - [`snapshot`]: the collaborator that computes results, and its context.
//! - [`cache`]: per-row storage and the at-most-once batch guard.

pub mod cache;
pub mod record;
pub mod snapshot;
pub mod window;

pub use cache::{CachedPerformance, MetricLookup, PerformanceCache};
pub use record::{MetricValue, PerformanceMetric, PerformanceRecord, Trend};
pub use snapshot::{FixedSnapshot, PerformanceSnapshot, SnapshotContext, SnapshotRequest, SnapshotScope};
pub use window::{DateInterval, ReportingWindow};
