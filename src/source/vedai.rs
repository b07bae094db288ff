//! VEDAI: space-delimited text annotations at 512px resolution.
//!
//! An image `00000001_co.png` under `Vehicules512/` is described by
//! `Annotations512/00000001.txt`. Each line holds
//! `cx cy orientation class contained occluded x1 x2 x3 x4 y1 y2 y3 y4`;
//! the class is field 4 and the corners are always the last 8 fields.

use std::path::Path;

use super::{
    read_dir_entry, strip_image_suffix, AnnotationSource, DirLayout, ImageEntry, ParsedObjects,
    RawObject, SourceImage, SplitList,
};
use crate::error::Rs2CocoError;
use crate::ir::RawGeometry;
use crate::policy::{LabelTable, NativeCategory};

pub const IMAGES_DIR: &str = "Vehicules512";
pub const ANNOTATIONS_DIR: &str = "Annotations512";
pub const IMAGE_SUFFIX: &str = "_co.png";

const fn unmapped(label: &'static str, name: &'static str) -> NativeCategory {
    NativeCategory {
        label,
        name,
        supercategory: name,
        default_id: None,
    }
}

const fn mapped(label: &'static str, name: &'static str, id: u64) -> NativeCategory {
    NativeCategory {
        label,
        name,
        supercategory: name,
        default_id: Some(id),
    }
}

/// Native class ids; pickup, boat, small car and large car are not mapped by default.
pub const CATEGORIES: &[NativeCategory] = &[
    mapped("1", "car", 0),
    mapped("2", "truck", 1),
    unmapped("3", "pickup"),
    mapped("4", "tractor", 2),
    mapped("5", "camping", 3),
    unmapped("6", "boat"),
    mapped("7", "motorcycle", 4),
    mapped("9", "bus", 5),
    mapped("10", "van", 6),
    mapped("11", "other", 7),
    unmapped("12", "small car"),
    unmapped("13", "large car"),
    mapped("31", "plane", 8),
    mapped("23", "board", 9),
];

/// Car and van.
pub const CAR_LABELS: &[&str] = &["1", "10"];

const MIN_FIELDS: usize = 12;
const CLASS_FIELD: usize = 3;

#[derive(Clone, Debug)]
pub struct VedaiSource {
    layout: DirLayout,
}

impl VedaiSource {
    pub fn open(data_dir: &Path) -> Result<Self, Rs2CocoError> {
        Ok(Self {
            layout: DirLayout::discover(data_dir, IMAGES_DIR, ANNOTATIONS_DIR)?,
        })
    }
}

impl AnnotationSource for VedaiSource {
    fn name(&self) -> &'static str {
        "VEDAI"
    }

    fn label_table(&self) -> LabelTable {
        LabelTable::from_static(CATEGORIES)
    }

    fn car_labels(&self) -> &[&'static str] {
        CAR_LABELS
    }

    fn list_images(&self, split: &SplitList) -> Result<Vec<ImageEntry>, Rs2CocoError> {
        self.layout.list_split_images(split, |name| {
            format!("{}.txt", strip_image_suffix(name, IMAGE_SUFFIX))
        })
    }

    fn read_image(&self, entry: &ImageEntry) -> Result<SourceImage, Rs2CocoError> {
        read_dir_entry(entry, parse_vedai_txt_str)
    }
}

/// Parses a VEDAI annotation file.
pub fn parse_vedai_txt_str(content: &str, path: &Path) -> Result<ParsedObjects, Rs2CocoError> {
    let mut parsed = ParsedObjects::default();

    for (line_idx, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < MIN_FIELDS {
            log::debug!(
                "{}:{}: {} field(s), expected at least {MIN_FIELDS}",
                path.display(),
                line_idx + 1,
                fields.len()
            );
            parsed.malformed += 1;
            continue;
        }

        let corners = &fields[fields.len() - 8..];
        let mut values = [0.0f64; 8];
        for (slot, field) in values.iter_mut().zip(corners) {
            let value = field
                .parse::<i64>()
                .map_err(|_| Rs2CocoError::TextAnnotationParse {
                    path: path.to_path_buf(),
                    line: line_idx + 1,
                    message: format!("corner '{field}' is not an integer"),
                })?;
            *slot = value as f64;
        }

        parsed.objects.push(RawObject::new(
            fields[CLASS_FIELD],
            RawGeometry::from_xs_ys(&values[..4], &values[4..]),
        ));
    }

    Ok(parsed)
}
