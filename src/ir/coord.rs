//! Pixel-space points used as polygon corners.

use serde::{Deserialize, Serialize};

/// A 2D point in absolute pixel coordinates, (0, 0) at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parses an `"x,y"` pair as written in FAIR1M `<point>` elements.
    ///
    /// Surrounding whitespace around either number is ignored.
    pub fn parse_pair(raw: &str) -> Option<Self> {
        let (x, y) = raw.split_once(',')?;
        let x = x.trim().parse::<f64>().ok()?;
        let y = y.trim().parse::<f64>().ok()?;
        Some(Self::new(x, y))
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_creation() {
        let coord = Coord::new(10.0, 20.0);
        assert_eq!(coord.x, 10.0);
        assert_eq!(coord.y, 20.0);
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(Coord::parse_pair("12.5,7"), Some(Coord::new(12.5, 7.0)));
        assert_eq!(Coord::parse_pair(" 1 , 2 "), Some(Coord::new(1.0, 2.0)));
        assert_eq!(Coord::parse_pair("1;2"), None);
        assert_eq!(Coord::parse_pair("a,2"), None);
        assert_eq!(Coord::parse_pair(""), None);
    }

    #[test]
    fn test_coord_is_finite() {
        assert!(Coord::new(10.0, 20.0).is_finite());
        assert!(!Coord::new(f64::NAN, 20.0).is_finite());
        assert!(!Coord::new(10.0, f64::INFINITY).is_finite());
    }
}
