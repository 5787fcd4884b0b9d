//! Tuning parameters of the Cupid matcher.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Coefficients and thresholds for one matching invocation.
///
/// Passed by value into every [`Cupid`](crate::Cupid) instead of living in
/// shared state, so concurrent requests never observe each other's settings.
/// Defaults are the values recommended by the Cupid paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CupidParams {
    /// Weight of structural vs. linguistic evidence for leaf pairs.
    pub leaf_w_struct: f64,
    /// Weight of structural vs. linguistic evidence for internal pairs and
    /// the final recompute.
    pub w_struct: f64,
    /// Minimum final score for a column pair to be accepted.
    pub th_accept: f64,
    /// Leaf links at or above this score are strong.
    pub th_high: f64,
    /// Leaf links below this score are weak.
    pub th_low: f64,
    /// Multiplier applied to leaf structural similarity under a node pair
    /// whose leaves are mostly strongly linked.
    pub c_inc: f64,
    /// Multiplier applied to leaf structural similarity under a node pair
    /// whose leaves are mostly weakly linked.
    pub c_dec: f64,
    /// Table alignment at which leaf structural similarity is left unchanged
    /// by the final recompute.
    pub th_ns: f64,
}

impl Default for CupidParams {
    fn default() -> Self {
        Self {
            leaf_w_struct: 0.2,
            w_struct: 0.2,
            th_accept: 0.7,
            th_high: 0.6,
            th_low: 0.35,
            c_inc: 1.2,
            c_dec: 0.9,
            th_ns: 0.7,
        }
    }
}

impl CupidParams {
    /// Checks that weights and thresholds lie in `[0, 1]`, coefficients are
    /// positive, `th_low <= th_high` and `th_ns > 0`.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("leaf_w_struct", self.leaf_w_struct),
            ("w_struct", self.w_struct),
            ("th_accept", self.th_accept),
            ("th_high", self.th_high),
            ("th_low", self.th_low),
            ("th_ns", self.th_ns),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidParameter {
                    name,
                    value,
                    reason: "must be within [0, 1]",
                });
            }
        }
        for (name, value) in [("c_inc", self.c_inc), ("c_dec", self.c_dec)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MatchError::InvalidParameter {
                    name,
                    value,
                    reason: "must be a positive number",
                });
            }
        }
        if self.th_low > self.th_high {
            return Err(MatchError::InvalidParameter {
                name: "th_low",
                value: self.th_low,
                reason: "must not exceed th_high",
            });
        }
        if self.th_ns == 0.0 {
            return Err(MatchError::InvalidParameter {
                name: "th_ns",
                value: self.th_ns,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}
