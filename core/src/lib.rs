//! Commission, reconciliation and marketing ROI batch.
//!
//! Loads CRM, finance and marketing exports, runs the fixed stage
//! pipeline in `engine`, and writes flat CSV reports.

pub mod aggregation_stage;
pub mod attribution_stage;
pub mod clawback_stage;
pub mod commission_stage;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod identifier_stage;
pub mod lead_scoring_stage;
pub mod mock_data;
pub mod money;
pub mod name_generator;
pub mod quarter;
pub mod reconciliation_stage;
pub mod records;
pub mod rng;
pub mod stage;
pub mod tables;
pub mod types;
