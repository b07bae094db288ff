//! DIOR: Pascal-VOC style XML with horizontal bounding boxes.
//!
//! Layout under the data directory:
//!
//! ```text
//! JPEGImages-all/00001.jpg
//! Annotations/Horizontal Bounding Boxes/00001.xml
//! ```

use std::path::Path;

use roxmltree::Node;

use super::xml::{
    child_element, child_elements, parse_document, required_child_element, required_child_text,
};
use super::{
    read_dir_entry, strip_image_suffix, AnnotationSource, DirLayout, ImageEntry, ParsedObjects,
    RawObject, SourceImage, SplitList,
};
use crate::error::Rs2CocoError;
use crate::ir::RawGeometry;
use crate::policy::{LabelTable, NativeCategory};

pub const IMAGES_DIR: &str = "JPEGImages-all";
pub const ANNOTATIONS_DIR: &str = "Annotations/Horizontal Bounding Boxes";

pub const CATEGORIES: &[NativeCategory] = &[
    NativeCategory::plain("stadium", 0),
    NativeCategory::plain("Expressway-toll-station", 1),
    NativeCategory::plain("bridge", 2),
    NativeCategory::plain("groundtrackfield", 3),
    NativeCategory::plain("Expressway-Service-area", 4),
    NativeCategory::plain("dam", 5),
    NativeCategory::plain("ship", 6),
    NativeCategory::plain("basketballcourt", 7),
    NativeCategory::plain("vehicle", 8),
    NativeCategory::plain("golffield", 9),
    NativeCategory::plain("airplane", 10),
    NativeCategory::plain("baseballfield", 11),
    NativeCategory::plain("airport", 12),
    NativeCategory::plain("harbor", 13),
    NativeCategory::plain("chimney", 14),
    NativeCategory::plain("tenniscourt", 15),
    NativeCategory::plain("trainstation", 16),
    NativeCategory::plain("overpass", 17),
    NativeCategory::plain("storagetank", 18),
    NativeCategory::plain("windmill", 19),
];

pub const CAR_LABELS: &[&str] = &["vehicle"];

#[derive(Clone, Debug)]
pub struct DiorSource {
    layout: DirLayout,
}

impl DiorSource {
    pub fn open(data_dir: &Path) -> Result<Self, Rs2CocoError> {
        Ok(Self {
            layout: DirLayout::discover(data_dir, IMAGES_DIR, ANNOTATIONS_DIR)?,
        })
    }
}

impl AnnotationSource for DiorSource {
    fn name(&self) -> &'static str {
        "DIOR"
    }

    fn label_table(&self) -> LabelTable {
        LabelTable::from_static(CATEGORIES)
    }

    fn car_labels(&self) -> &[&'static str] {
        CAR_LABELS
    }

    fn list_images(&self, split: &SplitList) -> Result<Vec<ImageEntry>, Rs2CocoError> {
        self.layout.list_split_images(split, |name| {
            format!("{}.xml", strip_image_suffix(name, ".jpg"))
        })
    }

    fn read_image(&self, entry: &ImageEntry) -> Result<SourceImage, Rs2CocoError> {
        read_dir_entry(entry, parse_dior_xml_str)
    }
}

/// Parses one DIOR annotation document.
///
/// Every `<object>` needs a `<name>` and a `<bndbox>`; a box coordinate that
/// is missing or not a number makes that object malformed.
pub fn parse_dior_xml_str(xml: &str, path: &Path) -> Result<ParsedObjects, Rs2CocoError> {
    let doc = parse_document(xml, path)?;
    let root = doc.root_element();

    let mut parsed = ParsedObjects::default();
    for (idx, object) in child_elements(root, "object").enumerate() {
        let context = format!("<object> #{}", idx + 1);
        let label = required_child_text(object, "name", path, &context)?;
        let bndbox = required_child_element(object, "bndbox", path, &context)?;

        match read_bndbox(bndbox) {
            Some(geometry) => parsed.objects.push(RawObject::new(label, geometry)),
            None => {
                log::debug!("{}: {context} has an unreadable <bndbox>", path.display());
                parsed.malformed += 1;
            }
        }
    }

    Ok(parsed)
}

fn read_bndbox(bndbox: Node<'_, '_>) -> Option<RawGeometry> {
    let coord = |tag: &str| -> Option<f64> {
        let text = child_element(bndbox, tag)?.text()?.trim().to_string();
        text.parse::<f64>().ok().filter(|value| value.is_finite())
    };

    Some(RawGeometry::Box {
        xmin: coord("xmin")?,
        ymin: coord("ymin")?,
        xmax: coord("xmax")?,
        ymax: coord("ymax")?,
    })
}
