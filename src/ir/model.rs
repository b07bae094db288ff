//! Core dataset model assembled by the conversion pipeline.
//!
//! Sources produce raw objects; the pipeline remaps and filters them into
//! this model, and the COCO writer renders it out.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYXY;
use super::ids::{AnnotationId, CategoryId, ImageId};

/// A converted detection dataset.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub images: Vec<Image>,
    pub categories: Vec<Category>,
    pub annotations: Vec<Annotation>,
}

/// An image in the dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,

    /// Path of the image relative to the dataset root, `/`-separated.
    pub file_name: String,

    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// An output category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    /// Creates a category whose supercategory is its own name.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            supercategory: name.clone(),
            name,
        }
    }

    pub fn with_supercategory(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        supercategory: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: supercategory.into(),
        }
    }
}

/// A remapped, area-filtered object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,

    /// Native name of the source label; the conversion report tallies
    /// written annotations by it.
    pub category_name: String,

    pub bbox: BBoxXYXY,
}

impl Annotation {
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        category_name: impl Into<String>,
        bbox: BBoxXYXY,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            category_id: category_id.into(),
            category_name: category_name.into(),
            bbox,
        }
    }

    /// `w * h` of the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.bbox.area()
    }
}
