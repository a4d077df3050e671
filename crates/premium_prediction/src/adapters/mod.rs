// Rust guideline compliant 2026-02-23

//! Adapters (secondary ports) for the premium-prediction binary.
//!
//! `regression_model` and `scaler_bundle` implement the `domain::Regressor`
//! and `domain::Scaler` ports over JSON artifact files; `artifact_store`
//! loads all four of them into one validated context.

pub mod artifact_store;
pub mod regression_model;
pub mod scaler_bundle;
