//! Inventory pipeline: usage collection, normalization and redundancy analysis.

pub mod collector;
pub mod normalizer;
pub mod redundancy;
pub mod usage;

pub use collector::{collect, InventoryCollector};
