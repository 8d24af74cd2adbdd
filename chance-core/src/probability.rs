//! Validated probability threshold.
//!
//! A [`Probability`] is an integer in `[1, 99]`. Gates compare it against a
//! uniform draw in `[1, 98]` with a strict `>`, so the chance that a call passes
//! is `(p - 1) / 98` rather than `p / 100`. [`Probability::effective_rate`]
//! reports that figure.

use crate::error::{GateError, Result};
use crate::types::{DRAW_SPAN, MAX_PROBABILITY, MIN_PROBABILITY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer pass threshold in `[1, 99]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Probability(u8);

impl Probability {
    /// Validate `value` as a threshold.
    pub fn new(value: i64) -> Result<Self> {
        if value < i64::from(MIN_PROBABILITY) || value > i64::from(MAX_PROBABILITY) {
            return Err(GateError::invalid_argument(format!(
                "probability must be within [{MIN_PROBABILITY}, {MAX_PROBABILITY}], got {value}"
            )));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| GateError::invalid_argument(format!("probability out of range: {value}")))
    }

    /// Threshold as a plain integer.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether a call with draw `draw` runs the wrapped function.
    pub fn admits(self, draw: u8) -> bool {
        self.0 > draw
    }

    /// Long-run fraction of calls that run the wrapped function.
    pub fn effective_rate(self) -> f64 {
        f64::from(self.0 - 1) / f64::from(DRAW_SPAN)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Probability> for i64 {
    fn from(p: Probability) -> Self {
        i64::from(p.0)
    }
}

impl From<Probability> for u8 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

macro_rules! impl_try_from_int {
    ($($t:ty),*) => {$(
        impl TryFrom<$t> for Probability {
            type Error = GateError;

            fn try_from(value: $t) -> Result<Self> {
                let wide = i64::try_from(value).map_err(|_| {
                    GateError::invalid_argument(format!("probability out of range: {value}"))
                })?;
                Self::new(wide)
            }
        }
    )*};
}

impl_try_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_reject_float {
    ($($t:ty),*) => {$(
        impl TryFrom<$t> for Probability {
            type Error = GateError;

            fn try_from(value: $t) -> Result<Self> {
                Err(GateError::invalid_argument(format!(
                    "probability must be an integer, got {value:?}"
                )))
            }
        }
    )*};
}

impl_reject_float!(f32, f64);

impl FromStr for Probability {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s.trim().parse().map_err(|_| {
            GateError::invalid_argument(format!("probability must be an integer, got {s:?}"))
        })?;
        Self::new(value)
    }
}
