//! Functional validation building blocks
//!
//! Pure rules in [`validation_rules`] and the engine that folds them into
//! per-record error maps in [`validation_engine`].

pub mod validation_engine;
pub mod validation_rules;
