use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{error::ModelError, ids::ItemId, image::ImageKind};

/// How target paths are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExportMethod {
    /// Everything merged under one destination root.
    #[default]
    Single,
    /// One full output subtree per configured root.
    Separate,
}

impl ExportMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportMethod::Single => "single",
            ExportMethod::Separate => "separate",
        }
    }
}

impl FromStr for ExportMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ExportMethod::Single),
            "separate" => Ok(ExportMethod::Separate),
            _ => Err(ModelError::InvalidExportMethod(s.to_string())),
        }
    }
}

impl fmt::Display for ExportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One destination root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportTarget {
    pub root: PathBuf,
    pub method: ExportMethod,
}

impl ExportTarget {
    pub fn new(root: impl Into<PathBuf>, method: ExportMethod) -> Self {
        Self {
            root: root.into(),
            method,
        }
    }

    /// Targets for a run: `Single` keeps only the first path, `Separate`
    /// keeps all of them in order.
    pub fn from_paths(paths: &[PathBuf], method: ExportMethod) -> Vec<Self> {
        match method {
            ExportMethod::Single => paths
                .first()
                .map(|root| vec![ExportTarget::new(root.clone(), method)])
                .unwrap_or_default(),
            ExportMethod::Separate => paths
                .iter()
                .map(|root| ExportTarget::new(root.clone(), method))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A resolved cached image and where it will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub item_id: ItemId,
    pub item_label: String,
    pub kind: ImageKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// An image the server advertises but the metadata store does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingImage {
    pub item_id: ItemId,
    pub item_label: String,
    pub kind: ImageKind,
}

/// Every copy an export run will attempt, resolved before anything is
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPlan {
    pub entries: Vec<PlanEntry>,
    pub missing: Vec<MissingImage>,
    pub items_processed: usize,
    /// Per-item failures hit while resolving (catalog lookups, unreadable
    /// cache files).
    pub errors: usize,
}

impl ExportPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Summary counters known before execution.
    pub fn initial_summary(&self) -> ExportSummary {
        ExportSummary {
            items_processed: self.items_processed,
            missing: self.missing.len(),
            errors: self.errors,
            ..ExportSummary::default()
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportSummary {
    pub items_processed: usize,
    /// New files written.
    pub copied: usize,
    /// Existing files overwritten because they differed from the cache.
    pub updated: usize,
    /// Existing files left alone because they were identical.
    pub skipped: usize,
    pub missing: usize,
    pub errors: usize,
}

impl ExportSummary {
    pub fn files_written(&self) -> usize {
        self.copied + self.updated
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Operation Summary ===")?;
        writeln!(f, "Items processed:                 {}", self.items_processed)?;
        writeln!(f, "Files successfully copied:       {}", self.copied)?;
        writeln!(f, "Files updated (content changed): {}", self.updated)?;
        writeln!(f, "Files skipped (identical):       {}", self.skipped)?;
        writeln!(f, "Source files missing:            {}", self.missing)?;
        writeln!(f, "Errors encountered:              {}", self.errors)?;
        write!(f, "=========================")
    }
}
