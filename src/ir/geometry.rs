//! Raw source geometry and its normalization to axis-aligned boxes.
//!
//! Every dataset describes objects either as an explicit axis-aligned box
//! (DIOR, xView) or as the corners of a possibly rotated polygon (DOTA2,
//! FAIR1M, VEDAI). Both collapse to a [`BBoxXYXY`]; rotation is discarded.

use super::bbox::BBoxXYXY;
use super::coord::Coord;

/// Geometry as read from a source annotation, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum RawGeometry {
    /// Explicit `(xmin, ymin, xmax, ymax)`; kept verbatim, even if inverted.
    Box {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },
    /// Polygon corners; the box is their min/max envelope.
    Corners(Vec<Coord>),
}

impl RawGeometry {
    /// Builds corner geometry from parallel x and y sequences.
    ///
    /// Extra values in the longer sequence are ignored.
    pub fn from_xs_ys(xs: &[f64], ys: &[f64]) -> Self {
        RawGeometry::Corners(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Coord::new(x, y))
                .collect(),
        )
    }

    /// Normalizes to an axis-aligned box.
    ///
    /// Returns `None` for corner geometry without any corner, or when a
    /// coordinate is NaN or infinite.
    pub fn normalize(&self) -> Option<BBoxXYXY> {
        let bbox = match self {
            RawGeometry::Box {
                xmin,
                ymin,
                xmax,
                ymax,
            } => BBoxXYXY::from_xyxy(*xmin, *ymin, *xmax, *ymax),
            RawGeometry::Corners(corners) if corners.iter().all(Coord::is_finite) => {
                BBoxXYXY::enclosing(corners)?
            }
            RawGeometry::Corners(_) => return None,
        };
        bbox.is_finite().then_some(bbox)
    }
}
