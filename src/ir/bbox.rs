//! Axis-aligned bounding boxes in canonical XYXY format.

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// Note: This type does NOT enforce that min <= max. Annotation sources may
/// carry inverted boxes (DIOR and xView store corners verbatim). Inverted
/// boxes are never written: see [`BBoxXYXY::is_inverted`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BBoxXYXY {
    pub min: Coord,
    pub max: Coord,
}

impl BBoxXYXY {
    /// Creates a new bounding box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Converts from XYWH format (x, y, width, height) where (x, y) is the top-left corner.
    ///
    /// This is the format used by COCO annotations.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Returns the tightest axis-aligned box around `corners`.
    ///
    /// Returns `None` for an empty slice.
    pub fn enclosing(corners: &[Coord]) -> Option<Self> {
        let (first, rest) = corners.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for corner in rest {
            min.x = min.x.min(corner.x);
            min.y = min.y.min(corner.y);
            max.x = max.x.max(corner.x);
            max.y = max.y.max(corner.y);
        }
        Some(Self { min, max })
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }

    /// Returns the width of the bounding box.
    ///
    /// May be negative if the box is inverted (xmax < xmin).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the height of the bounding box.
    ///
    /// May be negative if the box is inverted (ymax < ymin).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns `width * height`, which may be zero or negative.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if either axis runs backwards (`max < min`).
    ///
    /// A box inverted on both axes has a positive `area()`, so the area
    /// alone does not reject it.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.width() < 0.0 || self.height() < 0.0
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Converts to XYWH format (x, y, width, height).
    #[inline]
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.xmin(), self.ymin(), self.width(), self.height()]
    }
}
