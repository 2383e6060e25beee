//! Worker tasks that back the runtime orchestration.
//!
//! Each region is owned by exactly one [`RegionWorker`]; all mutation of its
//! creatures and props happens on that task.

mod region;

pub use region::{Command, RegionWorker, WorkerServices};
