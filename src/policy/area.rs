//! Box-area acceptance intervals.

use std::fmt;

use serde::Serialize;

/// Upper bound shared by the car-centric modes, in square pixels.
pub const CAR_MAX_AREA: f64 = 400.0;

/// Lower edge of an [`AreaFilter`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LowerBound {
    Unbounded,
    /// `area > value`
    Exclusive(f64),
    /// `area >= value`
    Inclusive(f64),
}

/// An area interval; the upper edge, when present, is always exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AreaFilter {
    pub lower: LowerBound,
    pub upper: Option<f64>,
}

impl AreaFilter {
    /// `area > 0`, used by `original` mode.
    pub fn positive() -> Self {
        Self {
            lower: LowerBound::Exclusive(0.0),
            upper: None,
        }
    }

    /// `0 < area < max`, used by the car-centric modes with [`CAR_MAX_AREA`].
    pub fn positive_below(max: f64) -> Self {
        Self {
            lower: LowerBound::Exclusive(0.0),
            upper: Some(max),
        }
    }

    /// `min <= area < max`.
    pub fn half_open(min: f64, max: f64) -> Self {
        Self {
            lower: LowerBound::Inclusive(min),
            upper: Some(max),
        }
    }

    /// `area < max` with no lower edge.
    pub fn below(max: f64) -> Self {
        Self {
            lower: LowerBound::Unbounded,
            upper: Some(max),
        }
    }

    pub fn accepts(&self, area: f64) -> bool {
        let lower_ok = match self.lower {
            LowerBound::Unbounded => true,
            LowerBound::Exclusive(min) => area > min,
            LowerBound::Inclusive(min) => area >= min,
        };
        lower_ok && self.upper.is_none_or(|max| area < max)
    }
}

impl fmt::Display for AreaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            LowerBound::Unbounded => write!(f, "(-inf")?,
            LowerBound::Exclusive(min) => write!(f, "({min}")?,
            LowerBound::Inclusive(min) => write!(f, "[{min}")?,
        }
        match self.upper {
            Some(max) => write!(f, ", {max})"),
            None => write!(f, ", inf)"),
        }
    }
}
