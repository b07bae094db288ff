use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rs2coco operations.
#[derive(Debug, Error)]
pub enum Rs2CocoError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset layout at {path}: {message}")]
    SourceLayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to parse split list {path} at line {line}: {message}")]
    SplitListParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse annotation XML {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    #[error("Failed to parse annotation text {path} at line {line}: {message}")]
    TextAnnotationParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse GeoJSON from {path}: {source}")]
    GeoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse class labels {path} at line {line}: {message}")]
    ClassLabelsParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse category remapping {path}: {message}")]
    CategoryRemapParse { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Invalid mode '{0}' (pick a defined mode: original, car_other, car)")]
    InvalidMode(String),

    #[error("Category '{0}' not found in input categories")]
    UnknownCategory(String),
}
