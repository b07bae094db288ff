//! Split membership lists.
//!
//! A split file names one image per line as a relative path such as
//! `images/P0001.png`. Only the second `/`-separated segment is matched
//! against image file names.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Rs2CocoError;

/// How a split line is reduced to the image name it selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitKey {
    /// Use the second segment; a line without `/` is an error.
    SecondSegment,
    /// Use the second segment, or the whole line when it has no `/`.
    SecondOrOnlySegment,
}

/// The set of image names belonging to one split.
#[derive(Clone, Debug)]
pub struct SplitList {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl SplitList {
    pub fn read(path: &Path, key: SplitKey) -> Result<Self, Rs2CocoError> {
        let content = fs::read_to_string(path).map_err(|source| Rs2CocoError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content, path, key)
    }

    /// Parses split content; `path` names the list in errors and output naming.
    pub fn parse_str(content: &str, path: &Path, key: SplitKey) -> Result<Self, Rs2CocoError> {
        let mut names = BTreeSet::new();

        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut segments = trimmed.split('/');
            let first = segments.next().unwrap_or_default();
            let name = match (segments.next(), key) {
                (Some(second), _) => second,
                (None, SplitKey::SecondOrOnlySegment) => first,
                (None, SplitKey::SecondSegment) => {
                    return Err(Rs2CocoError::SplitListParse {
                        path: path.to_path_buf(),
                        line: line_idx + 1,
                        message: format!("expected '<dir>/<image>', found '{trimmed}'"),
                    });
                }
            };

            if name.is_empty() {
                return Err(Rs2CocoError::SplitListParse {
                    path: path.to_path_buf(),
                    line: line_idx + 1,
                    message: format!("empty image name in '{trimmed}'"),
                });
            }

            names.insert(name.to_string());
        }

        Ok(Self {
            path: path.to_path_buf(),
            names,
        })
    }

    pub fn contains(&self, image_name: &str) -> bool {
        self.names.contains(image_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Base name of the split file up to its first `.`, e.g. `train` for
    /// `splits/train.v2.txt`. Names the converter's output file.
    pub fn output_stem(&self) -> String {
        let base = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match base.split('.').next() {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => base,
        }
    }
}
