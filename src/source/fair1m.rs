//! FAIR1M: XML annotations with four-corner polygons in floating point.
//!
//! ```xml
//! <annotation>
//!   <objects>
//!     <object>
//!       <possibleresult><name>Small Car</name></possibleresult>
//!       <points><point>10.5,20.0</point>...</points>
//!     </object>
//!   </objects>
//! </annotation>
//! ```

use std::path::Path;

use roxmltree::Node;

use super::xml::{
    child_element, child_elements, element_text, parse_document, required_child_element,
    required_child_text,
};
use super::{
    read_dir_entry, strip_image_suffix, AnnotationSource, DirLayout, ImageEntry, ParsedObjects,
    RawObject, SourceImage, SplitList,
};
use crate::error::Rs2CocoError;
use crate::ir::{Coord, RawGeometry};
use crate::policy::{LabelTable, NativeCategory};

pub const IMAGES_DIR: &str = "images";
pub const ANNOTATIONS_DIR: &str = "labelXml";

pub const CATEGORIES: &[NativeCategory] = &[
    NativeCategory::plain("A220", 0),
    NativeCategory::plain("A321", 1),
    NativeCategory::plain("A330", 2),
    NativeCategory::plain("A350", 3),
    NativeCategory::plain("ARJ21", 4),
    NativeCategory::plain("Baseball Field", 5),
    NativeCategory::plain("Basketball Court", 6),
    NativeCategory::plain("Boeing737", 7),
    NativeCategory::plain("Boeing747", 8),
    NativeCategory::plain("Boeing777", 9),
    NativeCategory::plain("Boeing787", 10),
    NativeCategory::plain("Bridge", 11),
    NativeCategory::plain("Bus", 12),
    NativeCategory::plain("C919", 13),
    NativeCategory::plain("Cargo Truck", 14),
    NativeCategory::plain("Dry Cargo Ship", 15),
    NativeCategory::plain("Dump Truck", 16),
    NativeCategory::plain("Engineering Ship", 17),
    NativeCategory::plain("Excavator", 18),
    NativeCategory::plain("Fishing Boat", 19),
    NativeCategory::plain("Football Field", 20),
    NativeCategory::plain("Intersection", 21),
    NativeCategory {
        label: "Liquid Cargo Ship",
        name: "Liquid Cargo Ship",
        supercategory: "Liquid Cargo",
        default_id: Some(22),
    },
    NativeCategory::plain("Motorboat", 23),
    NativeCategory::plain("other-airplane", 24),
    NativeCategory::plain("other-ship", 25),
    NativeCategory::plain("other-vehicle", 26),
    NativeCategory::plain("Passenger Ship", 27),
    NativeCategory::plain("Roundabout", 28),
    NativeCategory::plain("Small Car", 29),
    NativeCategory::plain("Tennis Court", 30),
    NativeCategory::plain("Tractor", 31),
    NativeCategory::plain("Trailer", 32),
    NativeCategory {
        label: "Truck Tractor",
        name: "Truck",
        supercategory: "Truck",
        default_id: Some(33),
    },
    NativeCategory::plain("Tugboat", 34),
    NativeCategory::plain("Van", 35),
    NativeCategory::plain("Warship", 36),
];

pub const CAR_LABELS: &[&str] = &["Small Car", "Van"];

#[derive(Clone, Debug)]
pub struct Fair1mSource {
    layout: DirLayout,
}

impl Fair1mSource {
    pub fn open(data_dir: &Path) -> Result<Self, Rs2CocoError> {
        Ok(Self {
            layout: DirLayout::discover(data_dir, IMAGES_DIR, ANNOTATIONS_DIR)?,
        })
    }
}

impl AnnotationSource for Fair1mSource {
    fn name(&self) -> &'static str {
        "FAIR1M"
    }

    fn label_table(&self) -> LabelTable {
        LabelTable::from_static(CATEGORIES)
    }

    fn car_labels(&self) -> &[&'static str] {
        CAR_LABELS
    }

    fn list_images(&self, split: &SplitList) -> Result<Vec<ImageEntry>, Rs2CocoError> {
        self.layout.list_split_images(split, |name| {
            format!("{}.xml", strip_image_suffix(name, ".tif"))
        })
    }

    fn read_image(&self, entry: &ImageEntry) -> Result<SourceImage, Rs2CocoError> {
        read_dir_entry(entry, parse_fair1m_xml_str)
    }
}

/// Parses one FAIR1M annotation document.
///
/// A document without `<objects>` has no objects. An object whose points are
/// absent or unreadable is malformed.
pub fn parse_fair1m_xml_str(xml: &str, path: &Path) -> Result<ParsedObjects, Rs2CocoError> {
    let doc = parse_document(xml, path)?;
    let root = doc.root_element();

    let mut parsed = ParsedObjects::default();
    let Some(objects) = child_element(root, "objects") else {
        log::debug!("{}: no <objects> element", path.display());
        return Ok(parsed);
    };

    for (idx, object) in child_elements(objects, "object").enumerate() {
        let context = format!("<object> #{}", idx + 1);
        let result = required_child_element(object, "possibleresult", path, &context)?;
        let label = required_child_text(result, "name", path, &context)?;

        match read_points(object) {
            Some(corners) => parsed
                .objects
                .push(RawObject::new(label, RawGeometry::Corners(corners))),
            None => {
                log::debug!("{}: {context} has no readable <points>", path.display());
                parsed.malformed += 1;
            }
        }
    }

    Ok(parsed)
}

fn read_points(object: Node<'_, '_>) -> Option<Vec<Coord>> {
    let points = child_element(object, "points")?;
    let corners = child_elements(points, "point")
        .map(|point| element_text(point).and_then(|text| Coord::parse_pair(&text)))
        .collect::<Option<Vec<_>>>()?;

    if corners.is_empty() {
        None
    } else {
        Some(corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation>
  <source><filename>0.tif</filename><origin>GF2/GF3</origin></source>
  <research><version>1.0</version></research>
  <size><width>1000</width><height>1000</height><depth>3</depth></size>
  <objects>
    <object>
      <coordinate>pixel</coordinate>
      <type>rectangle</type>
      <description>None</description>
      <possibleresult><name>Small Car</name></possibleresult>
      <points>
        <point>10.500000,20.000000</point>
        <point>22.500000,21.000000</point>
        <point>21.500000,30.000000</point>
        <point>9.500000,29.000000</point>
        <point>10.500000,20.000000</point>
      </points>
    </object>
    <object>
      <possibleresult><name>Truck Tractor</name></possibleresult>
      <points><point>100,100</point><point>140,100</point><point>140,120</point><point>100,120</point></points>
    </object>
  </objects>
</annotation>"#;

    #[test]
    fn parses_point_lists_into_corners() {
        let parsed = parse_fair1m_xml_str(SAMPLE, Path::new("0.xml")).expect("parse xml");

        assert_eq!(parsed.malformed, 0);
        assert_eq!(parsed.objects.len(), 2);
        assert_eq!(parsed.objects[0].label, "Small Car");

        let bbox = parsed.objects[0].geometry.normalize().expect("bbox");
        assert_eq!(bbox.to_xywh(), [9.5, 20.0, 13.0, 10.0]);
        assert_eq!(parsed.objects[1].label, "Truck Tractor");
    }

    #[test]
    fn empty_or_broken_points_are_malformed() {
        let xml = r#"<annotation><objects>
            <object><possibleresult><name>Van</name></possibleresult><points></points></object>
            <object><possibleresult><name>Van</name></possibleresult><points><point>1;2</point></points></object>
            <object><possibleresult><name>Van</name></possibleresult></object>
        </objects></annotation>"#;
        let parsed = parse_fair1m_xml_str(xml, Path::new("1.xml")).expect("parse xml");
        assert!(parsed.objects.is_empty());
        assert_eq!(parsed.malformed, 3);
    }

    #[test]
    fn missing_name_is_an_error() {
        let xml = r#"<annotation><objects><object><possibleresult/></object></objects></annotation>"#;
        let err = parse_fair1m_xml_str(xml, Path::new("2.xml")).unwrap_err();
        assert!(matches!(err, Rs2CocoError::XmlParse { .. }));
    }

    #[test]
    fn document_without_objects_is_empty() {
        let parsed =
            parse_fair1m_xml_str("<annotation/>", Path::new("3.xml")).expect("parse xml");
        assert_eq!(parsed, ParsedObjects::default());
    }

    #[test]
    fn truck_tractor_is_written_as_truck() {
        let table = LabelTable::from_static(CATEGORIES);
        let entry = table.get("Truck Tractor").expect("entry");
        assert_eq!(entry.name, "Truck");
        assert_eq!(entry.supercategory, "Truck");
        assert_eq!(table.entries().len(), 37);
    }
}
