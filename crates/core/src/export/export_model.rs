//! Export run configuration and the structured run summary.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where exports land. One subdirectory per reason code under `base_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub base_dir: PathBuf,
}

impl ExportConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory for a reason's files: `<base>/reason<code·2>`.
    pub fn reason_dir(&self, reason_code: &str) -> PathBuf {
        self.base_dir
            .join(format!("reason{}", pad_code(reason_code)))
    }
}

/// File name for a reason's export on a given day:
/// `reason<code·2>_<YYYYMMDD>.txt`. A second export on the same day
/// overwrites the earlier file; rows already flagged as synchronized are
/// never re-selected, so the replacement only carries newer rows.
pub fn export_file_name(reason_code: &str, date: NaiveDate) -> String {
    format!("reason{}_{}.txt", pad_code(reason_code), date.format("%Y%m%d"))
}

fn pad_code(code: &str) -> String {
    format!("{code:0>2}")
}

/// One file produced by an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub reason_code: String,
    pub file_name: String,
    pub path: PathBuf,
    pub entries_count: usize,
}

/// One reason whose export unit failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFailure {
    pub reason_code: String,
    pub message: String,
}

/// Consolidated result of one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_reasons: usize,
    pub successful_exports: usize,
    pub failed_exports: usize,
    pub exported_files: Vec<ExportedFile>,
    pub errors: Vec<ExportFailure>,
}

impl ExportSummary {
    pub fn new(total_reasons: usize) -> Self {
        Self {
            total_reasons,
            successful_exports: 0,
            failed_exports: 0,
            exported_files: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when no reason had anything to export and nothing failed.
    pub fn nothing_pending(&self) -> bool {
        self.successful_exports == 0 && self.failed_exports == 0
    }
}

/// A file found under the export tree by the listing helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub reason_dir: String,
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ExportArtifact {
    pub(crate) fn new(reason_dir: &Path, path: PathBuf, size_bytes: u64) -> Self {
        Self {
            reason_dir: reason_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path,
            size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_zero_padded_and_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(export_file_name("1", date), "reason01_20260807.txt");
        assert_eq!(export_file_name("07", date), "reason07_20260807.txt");
    }

    #[test]
    fn reason_dirs_are_namespaced_per_code() {
        let config = ExportConfig::new("/data/exports");
        assert_eq!(
            config.reason_dir("3"),
            PathBuf::from("/data/exports/reason03")
        );
    }
}
