//! DOTA v2: one text file per image with rotated quadrilaterals.
//!
//! Each object line reads `x1 y1 x2 y2 x3 y3 x4 y4 category difficult`.
//! Header lines (`imagesource:GoogleEarth`, `gsd:0.146`) have a single
//! token and are skipped.

use std::path::Path;

use super::{
    read_dir_entry, strip_image_suffix, AnnotationSource, DirLayout, ImageEntry, ParsedObjects,
    RawObject, SourceImage, SplitKey, SplitList,
};
use crate::error::Rs2CocoError;
use crate::ir::RawGeometry;
use crate::policy::{LabelTable, NativeCategory};

pub const IMAGES_DIR: &str = "images";
pub const ANNOTATIONS_DIR: &str = "labelTxt";

pub const CATEGORIES: &[NativeCategory] = &[
    NativeCategory::plain("plane", 0),
    NativeCategory::plain("baseball-diamond", 1),
    NativeCategory::plain("bridge", 2),
    NativeCategory::plain("ground-track-field", 3),
    NativeCategory::plain("small-vehicle", 4),
    NativeCategory::plain("large-vehicle", 5),
    NativeCategory::plain("ship", 6),
    NativeCategory::plain("tennis-court", 7),
    NativeCategory::plain("basketball-court", 8),
    NativeCategory::plain("storage-tank", 9),
    NativeCategory::plain("soccer-ball-field", 10),
    NativeCategory::plain("roundabout", 11),
    NativeCategory::plain("harbor", 12),
    NativeCategory::plain("swimming-pool", 13),
    NativeCategory::plain("helicopter", 14),
    NativeCategory::plain("container-crane", 15),
    NativeCategory::plain("airport", 16),
    NativeCategory::plain("helipad", 17),
];

pub const CAR_LABELS: &[&str] = &["small-vehicle"];

const CORNER_TOKENS: usize = 8;

#[derive(Clone, Debug)]
pub struct Dota2Source {
    layout: DirLayout,
}

impl Dota2Source {
    pub fn open(data_dir: &Path) -> Result<Self, Rs2CocoError> {
        Ok(Self {
            layout: DirLayout::discover(data_dir, IMAGES_DIR, ANNOTATIONS_DIR)?,
        })
    }
}

impl AnnotationSource for Dota2Source {
    fn name(&self) -> &'static str {
        "DOTA2"
    }

    fn label_table(&self) -> LabelTable {
        LabelTable::from_static(CATEGORIES)
    }

    fn car_labels(&self) -> &[&'static str] {
        CAR_LABELS
    }

    fn split_key(&self) -> SplitKey {
        SplitKey::SecondOrOnlySegment
    }

    fn list_images(&self, split: &SplitList) -> Result<Vec<ImageEntry>, Rs2CocoError> {
        self.layout.list_split_images(split, |name| {
            format!("{}.txt", strip_image_suffix(name, ".png"))
        })
    }

    fn read_image(&self, entry: &ImageEntry) -> Result<SourceImage, Rs2CocoError> {
        read_dir_entry(entry, parse_dota_txt_str)
    }
}

/// Parses a DOTA label file.
///
/// Coordinates are truncated toward zero. Lines with 2 to 8 tokens carry no
/// category and are counted as malformed; a non-numeric coordinate on a
/// full-length line is an error.
pub fn parse_dota_txt_str(content: &str, path: &Path) -> Result<ParsedObjects, Rs2CocoError> {
    let mut parsed = ParsedObjects::default();

    for (line_idx, line) in content.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            continue;
        }
        if tokens.len() <= CORNER_TOKENS {
            log::debug!(
                "{}:{}: {} token(s), expected at least {}",
                path.display(),
                line_idx + 1,
                tokens.len(),
                CORNER_TOKENS + 1
            );
            parsed.malformed += 1;
            continue;
        }

        let mut values = [0.0f64; CORNER_TOKENS];
        for (slot, token) in values.iter_mut().zip(&tokens[..CORNER_TOKENS]) {
            *slot = parse_coordinate(token).ok_or_else(|| Rs2CocoError::TextAnnotationParse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                message: format!("invalid coordinate '{token}'"),
            })?;
        }

        let xs = [values[0], values[2], values[4], values[6]];
        let ys = [values[1], values[3], values[5], values[7]];
        parsed.objects.push(RawObject::new(
            tokens[CORNER_TOKENS],
            RawGeometry::from_xs_ys(&xs, &ys),
        ));
    }

    Ok(parsed)
}

fn parse_coordinate(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(f64::trunc)
}
