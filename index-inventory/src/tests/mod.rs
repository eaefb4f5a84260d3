pub mod common;

pub mod recreate;
pub mod report;
