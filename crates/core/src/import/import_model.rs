//! Structured result of one import run.

use serde::{Deserialize, Serialize};

/// One line that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFailure {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// The raw line as read.
    pub content: String,
    pub message: String,
}

/// Consolidated result of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub file_name: String,
    pub total_lines: usize,
    pub imported: usize,
    pub failed: usize,
    pub failures: Vec<LineFailure>,
}

impl ImportSummary {
    pub fn new(file_name: impl Into<String>, total_lines: usize) -> Self {
        Self {
            file_name: file_name.into(),
            total_lines,
            imported: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }
}
