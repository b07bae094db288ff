//! COCO JSON reader and writer.
//!
//! COCO bounding boxes use `[x, y, width, height]` format where `(x, y)` is
//! the top-left corner in absolute pixel coordinates. The converters produce
//! COCO from the [`Dataset`] model; the post-hoc filters read and rewrite COCO
//! documents directly, so the schema types here are public and keep any
//! field they do not model (`info`, `licenses`, `segmentation` polygons from
//! other tools, ...) in a flattened `extra` map.
//!
//! # Deterministic Output
//!
//! Converting a [`Dataset`] sorts all lists by ID.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::Dataset;
use crate::error::Rs2CocoError;

// ============================================================================
// COCO Schema Types
// ============================================================================

/// Top-level COCO dataset structure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CocoDataset {
    pub images: Vec<CocoImage>,

    pub annotations: Vec<CocoAnnotation>,

    pub categories: Vec<CocoCategory>,

    /// Top-level keys other than the three lists (e.g. `info`, `licenses`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// COCO image entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    #[serde(deserialize_with = "deserialize_dimension")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_dimension")]
    pub height: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// COCO category entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CocoCategory {
    /// A category whose supercategory repeats its name.
    pub fn named(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            supercategory: Some(name.to_string()),
            extra: Map::new(),
        }
    }
}

/// COCO annotation entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    /// Absent in some exports; written back only when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub image_id: u64,
    pub category_id: u64,

    /// COCO bbox format: [x, y, width, height] with (x,y) as top-left corner
    pub bbox: [f64; 4],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iscrowd: Option<u8>,

    /// Polygons or RLE; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts `1024` as well as `1024.0`; rejects fractional or negative sizes.
fn deserialize_dimension<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "invalid image dimension {value}"
        )))
    }
}

impl CocoAnnotation {
    /// The stored `area`, or `w * h` of the bbox when the field is absent.
    pub fn area(&self) -> f64 {
        self.area.unwrap_or(self.bbox[2] * self.bbox[3])
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Reads a COCO JSON file.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use rs2coco::ir::io_coco_json::read_coco_json;
///
/// let coco = read_coco_json(Path::new("train.json"))?;
/// println!("{} images", coco.images.len());
/// # Ok::<(), rs2coco::Rs2CocoError>(())
/// ```
pub fn read_coco_json(path: &Path) -> Result<CocoDataset, Rs2CocoError> {
    let file = File::open(path).map_err(|source| Rs2CocoError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| Rs2CocoError::CocoJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a COCO document to `path`, replacing any existing file.
pub fn write_coco_json(path: &Path, coco: &CocoDataset) -> Result<(), Rs2CocoError> {
    let file = File::create(path).map_err(|source| Rs2CocoError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, coco).map_err(|source| {
        Rs2CocoError::CocoJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|source| Rs2CocoError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a COCO document from a string.
pub fn from_coco_str(json: &str) -> Result<CocoDataset, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a COCO document from raw bytes.
pub fn from_coco_slice(bytes: &[u8]) -> Result<CocoDataset, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Renders a COCO document as pretty-printed JSON.
pub fn to_coco_string(coco: &CocoDataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(coco)
}

// ============================================================================
// Conversion: Dataset -> COCO
// ============================================================================

impl From<&Dataset> for CocoDataset {
    fn from(dataset: &Dataset) -> Self {
        let mut images: Vec<CocoImage> = dataset
            .images
            .iter()
            .map(|img| CocoImage {
                id: img.id.as_u64(),
                file_name: img.file_name.clone(),
                width: img.width,
                height: img.height,
                extra: Map::new(),
            })
            .collect();
        images.sort_by_key(|i| i.id);

        let mut categories: Vec<CocoCategory> = dataset
            .categories
            .iter()
            .map(|cat| CocoCategory {
                id: cat.id.as_u64(),
                name: cat.name.clone(),
                supercategory: Some(cat.supercategory.clone()),
                extra: Map::new(),
            })
            .collect();
        categories.sort_by_key(|c| c.id);

        let mut annotations: Vec<CocoAnnotation> = dataset
            .annotations
            .iter()
            .map(|ann| CocoAnnotation {
                id: Some(ann.id.as_u64()),
                image_id: ann.image_id.as_u64(),
                category_id: ann.category_id.as_u64(),
                bbox: ann.bbox.to_xywh(),
                area: Some(ann.area()),
                iscrowd: Some(0),
                segmentation: Some(Value::Array(vec![])),
                extra: Map::new(),
            })
            .collect();
        annotations.sort_by_key(|a| a.id);

        CocoDataset {
            images,
            annotations,
            categories,
            extra: Map::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
