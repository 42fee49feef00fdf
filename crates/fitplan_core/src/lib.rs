//! Shared fitness-plan domain primitives.
//!
//! This crate owns records, request/notification contracts, configuration,
//! prompt rendering and model-output extraction. It intentionally excludes
//! AWS SDK and Lambda runtime concerns, which live in `fitplan_lambda`.

pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod extraction;
pub mod prompts;
pub mod records;
pub mod update_expression;
