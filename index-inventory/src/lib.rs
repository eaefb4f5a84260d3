//! Index inventory for MongoDB clusters.
//!
//! Collects every index of every collection, annotates it with usage and shard-key facts,
//! flags redundant indexes, and round-trips the inventory through a compressed snapshot
//! that can be printed offline or replayed onto another cluster.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod inventory;
pub mod recreate;
pub mod report;
pub mod snapshot;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod tests;

// Re-export commonly used items
pub use error::{InventoryError, InventoryResult};
pub use inventory::collect;
pub use recreate::{recreate, RecreateSummary};
pub use report::{print, ReportOptions};
pub use snapshot::{load, save};
