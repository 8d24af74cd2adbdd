#![forbid(unsafe_code)]

//! Probabilistic call gate.
//!
//! Wrap a function so that each call runs it only with a configured chance,
//! returning a fixed default value otherwise.
//!
//! Provided features:
//! - Validated integer thresholds in `[1, 99]` ([`Probability`])
//! - Two-stage gate construction ([`make_gate`], [`Gate::wrap`])
//! - Injectable `rand` generators for reproducible decisions
//! - TOML / environment configuration ([`GateConfig`])

pub mod config;
pub mod error;
pub mod gate;
pub mod probability;
pub mod types;

pub use config::{GateConfig, GateConfigBuilder, GateRng};
pub use error::{GateError, Result};
pub use gate::{make_gate, ErasedTarget, Gate, Gated, Invoke};
pub use probability::Probability;
