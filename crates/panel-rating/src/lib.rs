//! Evaluation-rating workflow library.
//!
//! Evaluators sign in, walk a cascading assignment/position/item/candidate
//! selection, and rate candidates on competencies; secretariat users mark
//! candidates as disqualified or long-listed. All rows live in an external
//! spreadsheet reached through a gateway with a one-shot token-refresh
//! policy. The spreadsheet API and the identity provider are modeled as
//! traits so the workflow can be exercised entirely in memory.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
