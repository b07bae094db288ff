//! Per-dataset annotation sources.
//!
//! Each dataset is one [`AnnotationSource`]: it knows its native category
//! table, its car-like labels, how to enumerate the images a split selects,
//! and how to parse one image's annotation file into [`RawObject`]s. The
//! conversion pipeline only talks to this trait.
//!
//! Geometry that cannot be read (too few fields, unparseable numbers, empty
//! point lists) is counted and skipped. Files that cannot be parsed at all
//! are errors.

pub mod dior;
pub mod dota2;
pub mod fair1m;
mod split;
pub mod vedai;
pub mod xview;
mod xml;

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Rs2CocoError;
use crate::ir::RawGeometry;
use crate::policy::LabelTable;

pub use dior::DiorSource;
pub use dota2::Dota2Source;
pub use fair1m::Fair1mSource;
pub use split::{SplitKey, SplitList};
pub use vedai::VedaiSource;
pub use xview::XviewSource;

/// One object as read from a source annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawObject {
    /// Native label (numeric ids are kept as decimal strings).
    pub label: String,
    pub geometry: RawGeometry,
}

impl RawObject {
    pub fn new(label: impl Into<String>, geometry: RawGeometry) -> Self {
        Self {
            label: label.into(),
            geometry,
        }
    }
}

/// Objects parsed from one annotation file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedObjects {
    pub objects: Vec<RawObject>,
    /// Entries skipped because their geometry could not be read.
    pub malformed: usize,
}

/// An image selected by the split, before its annotations are read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageEntry {
    /// Bare image file name, as matched against the split list.
    pub name: String,
    /// Name written to COCO `file_name`.
    pub file_name: String,
    pub image_path: PathBuf,
    /// Per-image annotation file; `None` when annotations live in one shared file.
    pub annotation_path: Option<PathBuf>,
}

/// An image with its dimensions and raw objects.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub parsed: ParsedObjects,
}

/// A dataset-specific reader.
pub trait AnnotationSource {
    /// Short dataset name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Native categories in native order, with their default output ids.
    fn label_table(&self) -> LabelTable;

    /// Labels that mean "car" in this dataset.
    fn car_labels(&self) -> &[&'static str];

    fn split_key(&self) -> SplitKey {
        SplitKey::SecondSegment
    }

    /// Images selected by `split`, in processing order.
    fn list_images(&self, split: &SplitList) -> Result<Vec<ImageEntry>, Rs2CocoError>;

    /// Reads dimensions and objects of one listed image.
    fn read_image(&self, entry: &ImageEntry) -> Result<SourceImage, Rs2CocoError>;
}

/// A dataset root with one image directory and one annotation directory.
#[derive(Clone, Debug)]
pub(crate) struct DirLayout {
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub annotations_dir: PathBuf,
}

impl DirLayout {
    pub fn discover(root: &Path, images: &str, annotations: &str) -> Result<Self, Rs2CocoError> {
        if !root.is_dir() {
            return Err(Rs2CocoError::SourceLayoutInvalid {
                path: root.to_path_buf(),
                message: "data directory must be a directory".to_string(),
            });
        }

        let images_dir = root.join(images);
        if !images_dir.is_dir() {
            return Err(Rs2CocoError::SourceLayoutInvalid {
                path: images_dir,
                message: format!("missing {images}/ directory"),
            });
        }

        let annotations_dir = root.join(annotations);
        if !annotations_dir.is_dir() {
            return Err(Rs2CocoError::SourceLayoutInvalid {
                path: annotations_dir,
                message: format!("missing {annotations}/ directory"),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            images_dir,
            annotations_dir,
        })
    }

    /// Image files named by `split`, sorted by file name. `annotation_name`
    /// maps an image file name to its annotation file name.
    pub fn list_split_images(
        &self,
        split: &SplitList,
        annotation_name: impl Fn(&str) -> String,
    ) -> Result<Vec<ImageEntry>, Rs2CocoError> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.images_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| Rs2CocoError::SourceLayoutInvalid {
                path: self.images_dir.clone(),
                message: format!("failed while listing image directory: {source}"),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !split.contains(&name) {
                continue;
            }

            let image_path = entry.path().to_path_buf();
            entries.push(ImageEntry {
                file_name: rel_string(&self.root, &image_path),
                annotation_path: Some(self.annotations_dir.join(annotation_name(&name))),
                image_path,
                name,
            });
        }

        Ok(entries)
    }
}

/// The annotation path of a directory-layout entry.
pub(crate) fn annotation_path(entry: &ImageEntry) -> Result<&Path, Rs2CocoError> {
    entry
        .annotation_path
        .as_deref()
        .ok_or_else(|| Rs2CocoError::SourceLayoutInvalid {
            path: entry.image_path.clone(),
            message: format!("no annotation file recorded for image '{}'", entry.name),
        })
}

pub(crate) fn read_annotation_file(path: &Path) -> Result<String, Rs2CocoError> {
    fs::read_to_string(path).map_err(|source| Rs2CocoError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_image_dimensions(path: &Path) -> Result<(u32, u32), Rs2CocoError> {
    let size = imagesize::size(path).map_err(|source| Rs2CocoError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| Rs2CocoError::SourceLayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| Rs2CocoError::SourceLayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    Ok((width, height))
}

/// Reads image dimensions and annotation text for a directory-layout entry
/// and hands the text to `parse`.
pub(crate) fn read_dir_entry(
    entry: &ImageEntry,
    parse: impl FnOnce(&str, &Path) -> Result<ParsedObjects, Rs2CocoError>,
) -> Result<SourceImage, Rs2CocoError> {
    let (width, height) = read_image_dimensions(&entry.image_path)?;
    let path = annotation_path(entry)?;
    let content = read_annotation_file(path)?;
    let parsed = parse(&content, path)?;

    if parsed.malformed > 0 {
        log::warn!(
            "{}: skipped {} object(s) with malformed geometry",
            path.display(),
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

/// Image stem with `suffix` removed, falling back to the extension-less stem.
pub(crate) fn strip_image_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    name.strip_suffix(suffix)
        .or_else(|| name.rsplit_once('.').map(|(stem, _)| stem))
        .unwrap_or(name)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
