//! Sampling range and threshold bounds.

/// Smallest value a gate may draw per call.
pub const DRAW_MIN: u8 = 1;

/// Largest value a gate may draw per call (inclusive).
pub const DRAW_MAX: u8 = 98;

/// Lowest accepted probability threshold.
pub const MIN_PROBABILITY: u8 = 1;

/// Highest accepted probability threshold.
pub const MAX_PROBABILITY: u8 = 99;

/// Number of distinct draws; denominator of the effective pass rate.
pub const DRAW_SPAN: u8 = DRAW_MAX - DRAW_MIN + 1;
