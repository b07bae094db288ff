//! Intermediate representation shared by every dataset converter.
//!
//! Sources yield [`RawGeometry`]; the pipeline normalizes it into
//! [`BBoxXYXY`] boxes and assembles a [`Dataset`], which the COCO writer in
//! [`io_coco_json`] renders out.
//!
//! # Example
//!
//! ```
//! use rs2coco::ir::{Annotation, BBoxXYXY, Category, Dataset, Image, RawGeometry};
//!
//! let bbox = RawGeometry::from_xs_ys(&[10.0, 20.0, 20.0, 10.0], &[5.0, 5.0, 15.0, 15.0])
//!     .normalize()
//!     .unwrap();
//!
//! let dataset = Dataset {
//!     images: vec![Image::new(1u64, "images/P0001.png", 1024, 1024)],
//!     categories: vec![Category::new(1u64, "Car")],
//!     annotations: vec![Annotation::new(1u64, 1u64, 1u64, "small-vehicle", bbox)],
//! };
//! assert_eq!(dataset.annotations[0].area(), 100.0);
//! ```

mod bbox;
mod coord;
mod geometry;
mod ids;
pub mod io_coco_json;
mod model;

pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use geometry::RawGeometry;
pub use ids::{AnnotationId, CategoryId, ImageId};
pub use model::{Annotation, Category, Dataset, Image};
