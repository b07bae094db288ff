//! xView: one GeoJSON file covering every image.
//!
//! Each feature carries `properties.image_id`, `properties.type_id` and
//! `properties.bounds_imcoords` as a `"xmin,ymin,xmax,ymax"` string in pixel
//! coordinates. The category table is not fixed: names come from a
//! `type_id:name` class-label file, default output ids from a JSON mapping.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::{
    read_image_dimensions, AnnotationSource, ImageEntry, ParsedObjects, RawObject, SourceImage,
    SplitList,
};
use crate::error::Rs2CocoError;
use crate::ir::RawGeometry;
use crate::policy::{IdRemapping, LabelEntry, LabelTable};

pub const DEFAULT_CLASS_LABELS: &str = "xview_class_labels.txt";
pub const DEFAULT_CATEGORY_MAPPING: &str = "category_id_mapping.json";

/// Small Car.
pub const CAR_LABELS: &[&str] = &["18"];

/// Image with known broken labels in the public release.
pub const SKIPPED_IMAGE: &str = "1395.tif";

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Default, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    bounds_imcoords: Value,
    #[serde(default)]
    image_id: Option<String>,
    #[serde(default)]
    type_id: Value,
}

/// Objects grouped by image, as read from an xView GeoJSON file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XviewAnnotations {
    pub images: BTreeMap<String, ParsedObjects>,
    /// Features with bounds but no usable `image_id`.
    pub orphaned: usize,
}

impl XviewAnnotations {
    /// Image names ordered by the number before their first `.`; names
    /// without one sort last, by name.
    pub fn ordered_image_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.images.keys().map(String::as_str).collect();
        names.sort_by_key(|name| (image_index(name).unwrap_or(u64::MAX), *name));
        names
    }
}

fn image_index(name: &str) -> Option<u64> {
    name.split('.').next()?.parse().ok()
}

#[derive(Clone, Debug)]
pub struct XviewSource {
    images_dir: PathBuf,
    table: LabelTable,
    annotations: XviewAnnotations,
}

impl XviewSource {
    /// Loads the GeoJSON, class-label and mapping files up front.
    pub fn open(
        images_dir: &Path,
        geojson_path: &Path,
        class_labels_path: &Path,
        mapping_path: &Path,
    ) -> Result<Self, Rs2CocoError> {
        if !images_dir.is_dir() {
            return Err(Rs2CocoError::SourceLayoutInvalid {
                path: images_dir.to_path_buf(),
                message: "image directory must be a directory".to_string(),
            });
        }

        let class_labels = read_class_labels(class_labels_path)?;
        let mapping = IdRemapping::load(mapping_path)?;
        let table = build_label_table(&class_labels, &mapping);
        log::debug!(
            "xView: {} class label(s), {} mapped id(s)",
            class_labels.len(),
            mapping.len()
        );

        let geojson = fs::read_to_string(geojson_path).map_err(|source| Rs2CocoError::ReadFile {
            path: geojson_path.to_path_buf(),
            source,
        })?;
        let annotations = parse_xview_geojson_str(&geojson, geojson_path)?;
        if annotations.orphaned > 0 {
            log::warn!(
                "{}: skipped {} feature(s) without an image_id",
                geojson_path.display(),
                annotations.orphaned
            );
        }

        Ok(Self {
            images_dir: images_dir.to_path_buf(),
            table,
            annotations,
        })
    }
}

impl AnnotationSource for XviewSource {
    fn name(&self) -> &'static str {
        "xView"
    }

    fn label_table(&self) -> LabelTable {
        self.table.clone()
    }

    fn car_labels(&self) -> &[&'static str] {
        CAR_LABELS
    }

    fn list_images(&self, split: &SplitList) -> Result<Vec<ImageEntry>, Rs2CocoError> {
        Ok(self
            .annotations
            .ordered_image_names()
            .into_iter()
            .filter(|name| split.contains(name))
            .map(|name| ImageEntry {
                name: name.to_string(),
                file_name: name.to_string(),
                image_path: self.images_dir.join(name),
                annotation_path: None,
            })
            .collect())
    }

    fn read_image(&self, entry: &ImageEntry) -> Result<SourceImage, Rs2CocoError> {
        let (width, height) = read_image_dimensions(&entry.image_path)?;
        let parsed = self
            .annotations
            .images
            .get(&entry.name)
            .cloned()
            .unwrap_or_default();

        if parsed.malformed > 0 {
            log::warn!(
                "{}: skipped {} feature(s) with malformed bounds",
                entry.name,
                parsed.malformed
            );
        }

        Ok(SourceImage {
            file_name: entry.file_name.clone(),
            width,
            height,
            parsed,
        })
    }
}

/// Parses an xView GeoJSON feature collection.
///
/// Features with empty bounds are ignored, as is every feature of
/// [`SKIPPED_IMAGE`]. Bounds that are not exactly four integers, or a
/// missing `type_id`, make the feature malformed; its image stays listed.
pub fn parse_xview_geojson_str(
    json: &str,
    path: &Path,
) -> Result<XviewAnnotations, Rs2CocoError> {
    let collection: FeatureCollection =
        serde_json::from_str(json).map_err(|source| Rs2CocoError::GeoJsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut annotations = XviewAnnotations::default();
    for feature in collection.features {
        let properties = feature.properties;
        if bounds_are_empty(&properties.bounds_imcoords) {
            continue;
        }

        let Some(image_id) = properties.image_id.filter(|id| !id.is_empty()) else {
            annotations.orphaned += 1;
            continue;
        };
        if image_id == SKIPPED_IMAGE {
            continue;
        }

        let parsed = annotations.images.entry(image_id).or_default();
        match (
            parse_bounds(&properties.bounds_imcoords),
            type_label(&properties.type_id),
        ) {
            (Some(geometry), Some(label)) => parsed.objects.push(RawObject::new(label, geometry)),
            _ => parsed.malformed += 1,
        }
    }

    Ok(annotations)
}

fn bounds_are_empty(bounds: &Value) -> bool {
    match bounds {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn parse_bounds(bounds: &Value) -> Option<RawGeometry> {
    let text = bounds.as_str()?;
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let [xmin, ymin, xmax, ymax] = values.as_slice() else {
        return None;
    };
    Some(RawGeometry::Box {
        xmin: *xmin as f64,
        ymin: *ymin as f64,
        xmax: *xmax as f64,
        ymax: *ymax as f64,
    })
}

/// Parses one `bounds_imcoords` string as the GeoJSON reader does.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_bounds(text: &str) -> Option<RawGeometry> {
    parse_bounds(&Value::String(text.to_string()))
}

fn type_label(type_id: &Value) -> Option<String> {
    match type_id {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0 && *value >= 0.0)
                    .map(|value| value as u64)
            })
            .map(|id| id.to_string()),
        Value::String(text) => text.trim().parse::<u64>().ok().map(|id| id.to_string()),
        _ => None,
    }
}

/// Reads a `type_id:name` class-label file, keeping file order.
pub fn read_class_labels(path: &Path) -> Result<Vec<(String, String)>, Rs2CocoError> {
    let content = fs::read_to_string(path).map_err(|source| Rs2CocoError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_class_labels_str(&content, path)
}

pub fn parse_class_labels_str(
    content: &str,
    path: &Path,
) -> Result<Vec<(String, String)>, Rs2CocoError> {
    let mut labels = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((id, name)) = line.split_once(':') else {
            return Err(Rs2CocoError::ClassLabelsParse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                message: format!("expected '<type_id>:<name>', found '{}'", line.trim()),
            });
        };

        let id = id.trim();
        if id.is_empty() {
            return Err(Rs2CocoError::ClassLabelsParse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                message: "empty type id".to_string(),
            });
        }

        labels.push((id.to_string(), name.trim().to_string()));
    }

    Ok(labels)
}

/// Combines class labels with an id mapping; supercategory equals name.
pub fn build_label_table(class_labels: &[(String, String)], mapping: &IdRemapping) -> LabelTable {
    LabelTable::new(
        class_labels
            .iter()
            .map(|(id, name)| LabelEntry {
                label: id.clone(),
                name: name.clone(),
                supercategory: name.clone(),
                default_id: mapping.get(id),
            })
            .collect(),
    )
}
