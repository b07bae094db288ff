//! Conversion report types for tracking what a run kept and dropped.
//!
//! Every object read from a source ends up in exactly one bucket: written,
//! dropped for an unmapped label, dropped by the area filter, or skipped as
//! malformed geometry.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::policy::Mode;

/// A report generated by one dataset conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionReport {
    /// Source dataset name.
    pub dataset: String,
    pub mode: Mode,
    /// What was read from the source.
    pub input: SourceCounts,
    /// Counts in the written COCO file.
    pub output: ConversionCounts,
    pub dropped: DropCounts,
    /// Issues discovered during conversion.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(dataset: impl Into<String>, mode: Mode) -> Self {
        Self {
            dataset: dataset.into(),
            mode,
            input: SourceCounts::default(),
            output: ConversionCounts::default(),
            dropped: DropCounts::default(),
            issues: Vec::new(),
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Derives issues from the counters once the run is complete.
    pub fn finish(&mut self) {
        if self.input.split_entries > self.input.images {
            self.add(ConversionIssue::warning(
                ConversionIssueCode::SplitImagesNotFound,
                format!(
                    "{} split entr(ies) matched no image",
                    self.input.split_entries - self.input.images
                ),
            ));
        }

        if self.input.malformed > 0 {
            self.add(ConversionIssue::warning(
                ConversionIssueCode::MalformedGeometry,
                format!(
                    "{} object(s) skipped for malformed geometry",
                    self.input.malformed
                ),
            ));
        }

        if self.dropped.unmapped_label > 0 {
            self.add(ConversionIssue::info(
                ConversionIssueCode::UnmappedLabel,
                format!(
                    "{} object(s) dropped: label not in the {} mapping",
                    self.dropped.unmapped_label, self.mode
                ),
            ));
        }

        if self.dropped.outside_area > 0 {
            self.add(ConversionIssue::info(
                ConversionIssueCode::OutsideAreaRange,
                format!(
                    "{} object(s) dropped: area outside {}",
                    self.dropped.outside_area,
                    self.mode.area_filter()
                ),
            ));
        }
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {} ({} mode)", self.dataset, self.mode)?;
        writeln!(
            f,
            "  input: {} images, {} objects",
            self.input.images, self.input.objects
        )?;
        writeln!(
            f,
            "  output: {} images, {} categories, {} annotations",
            self.output.images, self.output.categories, self.output.annotations
        )?;
        if !self.output.by_label.is_empty() {
            let kept: Vec<String> = self
                .output
                .by_label
                .iter()
                .map(|(label, count)| format!("{label} {count}"))
                .collect();
            writeln!(f, "  kept by label: {}", kept.join(", "))?;
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts of COCO elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
    /// Written annotations per native label name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_label: BTreeMap<String, usize>,
}

/// What was read from the source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    /// Distinct image names in the split file.
    pub split_entries: usize,
    /// Images found and processed.
    pub images: usize,
    /// Objects with readable geometry.
    pub objects: usize,
    /// Objects skipped for malformed geometry.
    pub malformed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub unmapped_label: usize,
    pub outside_area: usize,
}

/// A single issue discovered during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Source data that could not be used.
    Warning,
    /// Objects dropped by the selected policy.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    SplitImagesNotFound,
    MalformedGeometry,
    UnmappedLabel,
    OutsideAreaRange,
}
