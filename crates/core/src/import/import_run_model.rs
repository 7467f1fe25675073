//! Audit trail of import runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::ImportSummary;

/// Outcome of a completed import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportRunStatus {
    Completed,
    CompletedWithErrors,
}

/// A recorded import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRun {
    pub id: String,
    pub file_name: String,
    pub total_lines: i64,
    pub imported_lines: i64,
    pub failed_lines: i64,
    pub status: ImportRunStatus,
    /// JSON-encoded per-line failures, when any.
    pub error_log: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImportRun {
    pub file_name: String,
    pub total_lines: i64,
    pub imported_lines: i64,
    pub failed_lines: i64,
    pub status: ImportRunStatus,
    pub error_log: Option<String>,
}

impl NewImportRun {
    pub fn from_summary(summary: &ImportSummary) -> Result<Self> {
        let status = if summary.failed == 0 {
            ImportRunStatus::Completed
        } else {
            ImportRunStatus::CompletedWithErrors
        };
        let error_log = if summary.failures.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&summary.failures)?)
        };
        Ok(Self {
            file_name: summary.file_name.clone(),
            total_lines: summary.total_lines as i64,
            imported_lines: summary.imported as i64,
            failed_lines: summary.failed as i64,
            status,
            error_log,
        })
    }
}

/// Repository contract for the import audit trail.
#[async_trait]
pub trait ImportRunRepositoryTrait: Send + Sync {
    async fn record(&self, run: NewImportRun) -> Result<ImportRun>;

    /// Most recent runs, newest first.
    fn list_recent(&self, limit: i64) -> Result<Vec<ImportRun>>;
}
