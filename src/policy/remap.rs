//! Category remapping from native source labels to output categories.
//!
//! A [`CategoryRemap`] is derived from borrowed inputs for one run and never
//! writes back into them: the native [`LabelTable`], the dataset's car-like
//! labels and an optional [`IdRemapping`] override stay exactly as passed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::Mode;
use crate::error::Rs2CocoError;
use crate::ir::{Category, CategoryId};

/// One native category as compiled into a source module.
#[derive(Clone, Copy, Debug)]
pub struct NativeCategory {
    /// Label as written in the annotation files (numeric ids as decimal strings).
    pub label: &'static str,
    pub name: &'static str,
    pub supercategory: &'static str,
    /// Output id in `original` mode; `None` keeps the label out of the default mapping.
    pub default_id: Option<u64>,
}

impl NativeCategory {
    /// A category whose name and supercategory equal its label.
    pub const fn plain(label: &'static str, default_id: u64) -> Self {
        Self {
            label,
            name: label,
            supercategory: label,
            default_id: Some(default_id),
        }
    }
}

/// Owned entry of a [`LabelTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelEntry {
    pub label: String,
    pub name: String,
    pub supercategory: String,
    pub default_id: Option<u64>,
}

/// A dataset's native categories in native order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
}

impl LabelTable {
    pub fn new(entries: Vec<LabelEntry>) -> Self {
        Self { entries }
    }

    pub fn from_static(categories: &[NativeCategory]) -> Self {
        Self::new(
            categories
                .iter()
                .map(|category| LabelEntry {
                    label: category.label.to_string(),
                    name: category.name.to_string(),
                    supercategory: category.supercategory.to_string(),
                    default_id: category.default_id,
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&LabelEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// Native name of `label`, or the label itself when the table lacks it.
    pub fn name_of<'a>(&'a self, label: &'a str) -> &'a str {
        self.get(label).map_or(label, |entry| entry.name.as_str())
    }

    /// The mapping used when no override is supplied.
    pub fn default_remapping(&self) -> IdRemapping {
        IdRemapping::new(
            self.entries
                .iter()
                .filter_map(|entry| entry.default_id.map(|id| (entry.label.clone(), id))),
        )
    }
}

/// Label to output-id table, as found in `category_id_mapping.json` style files.
///
/// JSON form is an object whose values may be numbers or numeric strings:
/// `{"small-vehicle": "4", "plane": 0}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdRemapping {
    ids: BTreeMap<String, u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl IdRemapping {
    pub fn new(ids: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Loads a remapping from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Rs2CocoError> {
        let json = fs::read_to_string(path).map_err(|source| Rs2CocoError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|message| Rs2CocoError::CategoryRemapParse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let raw: BTreeMap<String, RawId> =
            serde_json::from_str(json).map_err(|source| source.to_string())?;

        let mut ids = BTreeMap::new();
        for (label, value) in raw {
            let id = match value {
                RawId::Number(id) => id,
                RawId::Text(text) => text.trim().parse::<u64>().map_err(|_| {
                    format!("id '{text}' for label '{label}' is not a non-negative integer")
                })?,
            };
            ids.insert(label, id);
        }
        Ok(Self { ids })
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.ids.get(label).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Output category and native name an accepted label resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemapTarget {
    pub category_id: CategoryId,
    pub native_name: String,
}

/// The label mapping and category list for one mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRemap {
    categories: Vec<Category>,
    targets: BTreeMap<String, RemapTarget>,
}

impl CategoryRemap {
    /// Derives the mapping for `mode`.
    ///
    /// `override_ids` replaces the table's default mapping in `original` and
    /// `car_other` modes; `car` mode always keeps exactly `car_labels`.
    pub fn for_mode(
        table: &LabelTable,
        car_labels: &[&str],
        mode: Mode,
        override_ids: Option<&IdRemapping>,
    ) -> Self {
        let default_ids;
        let active = match override_ids {
            Some(ids) => ids,
            None => {
                default_ids = table.default_remapping();
                &default_ids
            }
        };

        let mut categories = Vec::new();
        let mut targets = BTreeMap::new();

        match mode {
            Mode::Original => {
                for entry in table.entries() {
                    let Some(id) = active.get(&entry.label) else {
                        continue;
                    };
                    let category_id = CategoryId::new(id);
                    if !categories.iter().any(|c: &Category| c.id == category_id) {
                        categories.push(Category::with_supercategory(
                            category_id,
                            entry.name.clone(),
                            entry.supercategory.clone(),
                        ));
                    }
                    targets.insert(
                        entry.label.clone(),
                        RemapTarget {
                            category_id,
                            native_name: entry.name.clone(),
                        },
                    );
                }
            }
            Mode::CarOther => {
                categories.push(Category::new(0u64, "Other"));
                categories.push(Category::new(1u64, "Car"));
                for label in active.labels() {
                    let id = if car_labels.contains(&label) { 1 } else { 0 };
                    targets.insert(
                        label.to_string(),
                        RemapTarget {
                            category_id: CategoryId::new(id),
                            native_name: table.name_of(label).to_string(),
                        },
                    );
                }
            }
            Mode::Car => {
                categories.push(Category::new(0u64, "Car"));
                for label in car_labels {
                    targets.insert(
                        (*label).to_string(),
                        RemapTarget {
                            category_id: CategoryId::new(0),
                            native_name: table.name_of(label).to_string(),
                        },
                    );
                }
            }
        }

        Self {
            categories,
            targets,
        }
    }

    /// Output categories, in the order they are written.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Resolves a source label; `None` means the object is dropped.
    pub fn lookup(&self, label: &str) -> Option<&RemapTarget> {
        self.targets.get(label)
    }

    pub fn accepted_labels(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}
