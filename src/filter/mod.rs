//! Post-hoc filters over existing COCO files.
//!
//! Both filters work on [`CocoDataset`] directly so that fields they do not
//! model (top-level `info`, per-image metadata, segmentation) survive the
//! rewrite. Output `images` are always exactly the images referenced by a
//! surviving annotation, in input order.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::conversion::ConversionCounts;
use crate::error::Rs2CocoError;
use crate::ir::io_coco_json::{read_coco_json, write_coco_json, CocoCategory, CocoDataset};
use crate::policy::AreaFilter;

/// Category id the DOTA development kit assigns to `small-vehicle`.
pub const DEFAULT_CAR_CATEGORY_ID: u64 = 5;

/// Before/after counts of one filter run.
#[derive(Clone, Debug, Serialize)]
pub struct FilterReport {
    pub input: PathBuf,
    /// `None` when nothing survived and no file was written.
    pub output: Option<PathBuf>,
    pub before: ConversionCounts,
    pub after: ConversionCounts,
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Filtered {}", self.input.display())?;
        writeln!(
            f,
            "  before: {} images, {} categories, {} annotations",
            self.before.images, self.before.categories, self.before.annotations
        )?;
        writeln!(
            f,
            "  after: {} images, {} categories, {} annotations",
            self.after.images, self.after.categories, self.after.annotations
        )?;
        match &self.output {
            Some(path) => writeln!(f, "  written to {}", path.display()),
            None => writeln!(f, "  nothing survived; no file written"),
        }
    }
}

fn counts(coco: &CocoDataset) -> ConversionCounts {
    ConversionCounts {
        images: coco.images.len(),
        categories: coco.categories.len(),
        annotations: coco.annotations.len(),
        ..Default::default()
    }
}

fn retain_referenced_images(coco: &mut CocoDataset) {
    let referenced: BTreeSet<u64> = coco.annotations.iter().map(|a| a.image_id).collect();
    coco.images.retain(|image| referenced.contains(&image.id));
}

/// Keeps annotations of the category named `category` whose area `filter`
/// accepts. Categories are left as they are.
pub fn filter_by_category_area(
    mut coco: CocoDataset,
    category: &str,
    filter: AreaFilter,
) -> Result<CocoDataset, Rs2CocoError> {
    let category_id = coco
        .categories
        .iter()
        .find(|c| c.name == category)
        .map(|c| c.id)
        .ok_or_else(|| Rs2CocoError::UnknownCategory(category.to_string()))?;
    log::info!("filtering category '{category}' (id {category_id}) to area {filter}");

    coco.annotations
        .retain(|ann| ann.category_id == category_id && filter.accepts(ann.area()));
    retain_referenced_images(&mut coco);
    Ok(coco)
}

/// Options of [`refilter_car`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarRefilter {
    /// Exclusive upper area bound.
    pub max_area: f64,
    /// Keep only the car category instead of splitting car/other.
    pub car_only: bool,
    pub car_category_id: u64,
}

impl CarRefilter {
    pub fn new(max_area: f64) -> Self {
        Self {
            max_area,
            car_only: false,
            car_category_id: DEFAULT_CAR_CATEGORY_ID,
        }
    }
}

/// Rewrites a multi-class COCO file into the car-only (`[0 Car]`) or
/// car/other (`[0 Other, 1 Car]`) label space, dropping annotations with
/// `area >= max_area`.
pub fn refilter_car(mut coco: CocoDataset, options: CarRefilter) -> CocoDataset {
    let filter = AreaFilter::below(options.max_area);
    let car_id = options.car_category_id;

    coco.annotations.retain(|ann| {
        filter.accepts(ann.area()) && (!options.car_only || ann.category_id == car_id)
    });
    for ann in &mut coco.annotations {
        ann.category_id = match (options.car_only, ann.category_id == car_id) {
            (true, _) => 0,
            (false, true) => 1,
            (false, false) => 0,
        };
    }

    coco.categories = if options.car_only {
        vec![CocoCategory::named(0, "Car")]
    } else {
        vec![CocoCategory::named(0, "Other"), CocoCategory::named(1, "Car")]
    };

    retain_referenced_images(&mut coco);
    coco
}

/// `<out dir>/<out stem>_<category>_<min>_<max>.json`, where the stem is the
/// output base name up to its first `.`.
pub fn category_filter_output_path(out: &Path, category: &str, min: f64, max: f64) -> PathBuf {
    let base = out
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = base.split('.').next().unwrap_or_default();
    let dir = out.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}_{category}_{min}_{max}.json"))
}

/// Reads `input`, applies [`filter_by_category_area`] and writes the result
/// next to `output` (see [`category_filter_output_path`]) unless it is empty.
pub fn run_category_filter(
    input: &Path,
    output: &Path,
    category: &str,
    min: f64,
    max: f64,
) -> Result<FilterReport, Rs2CocoError> {
    let coco = read_coco_json(input)?;
    let before = counts(&coco);

    let filtered = filter_by_category_area(coco, category, AreaFilter::half_open(min, max))?;
    let after = counts(&filtered);

    let written = if filtered.annotations.is_empty() {
        log::warn!("no '{category}' annotation has area in [{min}, {max}); nothing written");
        None
    } else {
        let path = category_filter_output_path(output, category, min, max);
        write_coco_json(&path, &filtered)?;
        log::info!("wrote {}", path.display());
        Some(path)
    };

    Ok(FilterReport {
        input: input.to_path_buf(),
        output: written,
        before,
        after,
    })
}

/// Reads `input`, applies [`refilter_car`] and writes `output`.
pub fn run_car_refilter(
    input: &Path,
    output: &Path,
    options: CarRefilter,
) -> Result<FilterReport, Rs2CocoError> {
    let coco = read_coco_json(input)?;
    let before = counts(&coco);

    let filtered = refilter_car(coco, options);
    let after = counts(&filtered);

    write_coco_json(output, &filtered)?;
    log::info!("wrote {}", output.display());

    Ok(FilterReport {
        input: input.to_path_buf(),
        output: Some(output.to_path_buf()),
        before,
        after,
    })
}
