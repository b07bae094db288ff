//! Category and area policy shared by every converter.
//!
//! A conversion [`Mode`] selects both halves of the policy: which
//! [`CategoryRemap`] is derived from the dataset's label table, and which
//! [`AreaFilter`] a remapped box must pass.

mod area;
mod remap;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use area::{AreaFilter, LowerBound, CAR_MAX_AREA};
pub use remap::{
    CategoryRemap, IdRemapping, LabelEntry, LabelTable, NativeCategory, RemapTarget,
};

use crate::error::Rs2CocoError;

/// Output label space of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Keep the dataset's full native category table.
    Original,
    /// Binary split: car-like labels become `Car` (1), every other known label `Other` (0).
    #[value(name = "car_other", alias = "car-other")]
    CarOther,
    /// Keep only car-like labels, as `Car` (0).
    Car,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Original => "original",
            Mode::CarOther => "car_other",
            Mode::Car => "car",
        }
    }

    /// Area interval a remapped box must fall into under this mode.
    pub fn area_filter(&self) -> AreaFilter {
        match self {
            Mode::Original => AreaFilter::positive(),
            Mode::CarOther | Mode::Car => AreaFilter::positive_below(CAR_MAX_AREA),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Rs2CocoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Mode::Original),
            "car_other" | "car-other" => Ok(Mode::CarOther),
            "car" => Ok(Mode::Car),
            other => Err(Rs2CocoError::InvalidMode(other.to_string())),
        }
    }
}
