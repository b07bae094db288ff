//! Dataset-agnostic conversion pipeline.
//!
//! For every image an [`AnnotationSource`] selects, objects are normalized to
//! axis-aligned boxes, remapped by the mode's [`CategoryRemap`], filtered by
//! the mode's [`AreaFilter`](crate::policy::AreaFilter), and collected into a
//! [`Dataset`]. Image and annotation ids are assigned from 1 in processing
//! order. Nothing is written until the whole split has been read.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
    DropCounts, SourceCounts,
};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Rs2CocoError;
use crate::ir::io_coco_json::{write_coco_json, CocoDataset};
use crate::ir::{Annotation, Dataset, Image};
use crate::policy::{CategoryRemap, IdRemapping, Mode};
use crate::source::{AnnotationSource, SplitList};

/// Options for one conversion run.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub mode: Mode,
    /// Replaces the dataset's default label-to-id mapping.
    pub category_remap: Option<IdRemapping>,
    pub show_progress: bool,
}

impl ConvertOptions {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            category_remap: None,
            show_progress: false,
        }
    }
}

/// Result of [`convert_split`].
#[derive(Clone, Debug)]
pub struct ConversionOutcome {
    pub output_path: PathBuf,
    pub report: ConversionReport,
}

/// Converts the images `split` selects from `source` into a [`Dataset`].
pub fn convert(
    source: &dyn AnnotationSource,
    split: &SplitList,
    options: &ConvertOptions,
) -> Result<(Dataset, ConversionReport), Rs2CocoError> {
    let table = source.label_table();
    let remap = CategoryRemap::for_mode(
        &table,
        source.car_labels(),
        options.mode,
        options.category_remap.as_ref(),
    );
    let area_filter = options.mode.area_filter();

    log::info!(
        "{}: {} mode, {} categories, area filter {}",
        source.name(),
        options.mode,
        remap.categories().len(),
        area_filter
    );

    let entries = source.list_images(split)?;
    log::info!(
        "{}: {} of {} split image(s) found",
        source.name(),
        entries.len(),
        split.len()
    );

    let mut report = ConversionReport::new(source.name(), options.mode);
    report.input.split_entries = split.len();

    let mut dataset = Dataset {
        categories: remap.categories().to_vec(),
        ..Default::default()
    };

    let progress = if options.show_progress {
        create_progress_bar(entries.len() as u64, source.name())
    } else {
        ProgressBar::hidden()
    };

    let mut next_annotation_id = 1u64;
    for (idx, entry) in entries.iter().enumerate() {
        let image = source.read_image(entry)?;
        let image_id = idx as u64 + 1;
        log::debug!(
            "{}: {}x{}, {} object(s)",
            image.file_name,
            image.width,
            image.height,
            image.parsed.objects.len()
        );

        report.input.images += 1;
        report.input.objects += image.parsed.objects.len();
        report.input.malformed += image.parsed.malformed;

        for object in &image.parsed.objects {
            let Some(target) = remap.lookup(&object.label) else {
                report.dropped.unmapped_label += 1;
                continue;
            };
            let Some(bbox) = object.geometry.normalize() else {
                report.input.malformed += 1;
                continue;
            };
            if bbox.is_inverted() || !area_filter.accepts(bbox.area()) {
                report.dropped.outside_area += 1;
                continue;
            }

            dataset.annotations.push(Annotation::new(
                next_annotation_id,
                image_id,
                target.category_id,
                target.native_name.clone(),
                bbox,
            ));
            next_annotation_id += 1;
        }

        dataset.images.push(Image::new(
            image_id,
            image.file_name,
            image.width,
            image.height,
        ));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let mut by_label = BTreeMap::new();
    for annotation in &dataset.annotations {
        *by_label.entry(annotation.category_name.clone()).or_insert(0) += 1;
    }
    report.output = ConversionCounts {
        images: dataset.images.len(),
        categories: dataset.categories.len(),
        annotations: dataset.annotations.len(),
        by_label,
    };
    report.finish();

    Ok((dataset, report))
}

/// Reads the split file with the source's split rule, converts, and writes
/// `<output_dir>/<split stem>.json`.
pub fn convert_split(
    source: &dyn AnnotationSource,
    split_path: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionOutcome, Rs2CocoError> {
    let split = SplitList::read(split_path, source.split_key())?;
    let (dataset, report) = convert(source, &split, options)?;
    let output_path = write_dataset(&dataset, output_dir, &split)?;

    Ok(ConversionOutcome {
        output_path,
        report,
    })
}

/// Output file for `split` under `output_dir`.
pub fn output_path(output_dir: &Path, split: &SplitList) -> PathBuf {
    output_dir.join(format!("{}.json", split.output_stem()))
}

/// Writes `dataset` as COCO JSON, creating `output_dir` if needed.
pub fn write_dataset(
    dataset: &Dataset,
    output_dir: &Path,
    split: &SplitList,
) -> Result<PathBuf, Rs2CocoError> {
    fs::create_dir_all(output_dir).map_err(|source| Rs2CocoError::WriteFile {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_path(output_dir, split);
    write_coco_json(&path, &CocoDataset::from(dataset))?;
    log::info!(
        "wrote {} image(s), {} annotation(s) to {}",
        dataset.images.len(),
        dataset.annotations.len(),
        path.display()
    );
    Ok(path)
}

/// Create a progress bar with the given length and label.
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
