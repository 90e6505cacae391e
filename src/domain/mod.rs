//! Core domain types and logic.

pub mod category;
pub mod service_row;
pub mod rules;
pub mod classifier;
pub mod charges;
pub mod comment;
pub mod aggregator;
pub mod report;
pub mod pipeline;
pub mod error;
