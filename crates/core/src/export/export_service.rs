use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info};
use tokio::fs;

use crate::entries::EntryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::reasons::{Reason, ReasonRepositoryTrait};

use super::format;
use super::{
    export_file_name, ExportArtifact, ExportConfig, ExportFailure, ExportSummary, ExportedFile,
};

/// Exports unsynchronized entries, one file per reason.
///
/// Each reason is an independent unit of work: a failed write is recorded in
/// the summary and the remaining reasons still run. The synchronization flag
/// is only flipped after the reason's file is durably on disk, so a crash in
/// between re-exports those rows on the next run instead of losing them.
pub struct ExportService {
    reason_repository: Arc<dyn ReasonRepositoryTrait>,
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    config: ExportConfig,
}

impl ExportService {
    pub fn new(
        reason_repository: Arc<dyn ReasonRepositoryTrait>,
        entry_repository: Arc<dyn EntryRepositoryTrait>,
        config: ExportConfig,
    ) -> Self {
        Self {
            reason_repository,
            entry_repository,
            config,
        }
    }

    /// Run one export pass over all active reasons.
    ///
    /// Returns the consolidated summary; the caller renders it. Fails only
    /// on batch-level setup problems (no reasons configured, base directory
    /// not creatable).
    pub async fn export_pending(&self) -> Result<ExportSummary> {
        let reasons = self.reason_repository.list_active()?;
        if reasons.is_empty() {
            return Err(Error::not_found("no loss reasons configured"));
        }
        info!("starting export for {} reasons", reasons.len());

        fs::create_dir_all(&self.config.base_dir)
            .await
            .map_err(|e| Error::write_io(e, &self.config.base_dir))?;

        let mut summary = ExportSummary::new(reasons.len());
        for reason in &reasons {
            match self.export_reason(reason).await {
                Ok(Some(file)) => {
                    info!(
                        "reason {}: wrote {} entries to {}",
                        reason.code,
                        file.entries_count,
                        file.path.display()
                    );
                    summary.successful_exports += 1;
                    summary.exported_files.push(file);
                }
                Ok(None) => {
                    debug!("reason {}: nothing pending", reason.code);
                }
                Err(err) => {
                    error!("reason {}: export failed: {err}", reason.code);
                    summary.failed_exports += 1;
                    summary.errors.push(ExportFailure {
                        reason_code: reason.code.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            "export finished: {} exported, {} failed",
            summary.successful_exports, summary.failed_exports
        );
        Ok(summary)
    }

    async fn export_reason(&self, reason: &Reason) -> Result<Option<ExportedFile>> {
        let entries = self
            .entry_repository
            .find_unsynchronized_by_reason(&reason.id)?;
        if entries.is_empty() {
            return Ok(None);
        }

        let dir = self.config.reason_dir(&reason.code);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::write_io(e, &dir))?;

        let file_name = export_file_name(&reason.code, Utc::now().date_naive());
        let path = dir.join(&file_name);
        let content = format::render_file(&entries);
        write_atomic(&path, &content).await?;

        // Flag only the rows actually written; interrupted runs re-export.
        let entry_ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        self.entry_repository.mark_synchronized(entry_ids).await?;

        Ok(Some(ExportedFile {
            reason_code: reason.code.clone(),
            file_name,
            path,
            entries_count: entries.len(),
        }))
    }

    /// Walk the export tree and return every produced file, newest first.
    pub async fn list_exported_files(&self) -> Result<Vec<ExportArtifact>> {
        let mut artifacts = Vec::new();
        let mut base = match fs::read_dir(&self.config.base_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(artifacts),
            Err(err) => return Err(Error::read_io(err, &self.config.base_dir)),
        };

        while let Some(reason_entry) = base
            .next_entry()
            .await
            .map_err(|e| Error::read_io(e, &self.config.base_dir))?
        {
            let reason_dir = reason_entry.path();
            if !reason_dir.is_dir() {
                continue;
            }
            let mut files = fs::read_dir(&reason_dir)
                .await
                .map_err(|e| Error::read_io(e, &reason_dir))?;
            while let Some(file_entry) = files
                .next_entry()
                .await
                .map_err(|e| Error::read_io(e, &reason_dir))?
            {
                let path = file_entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                    continue;
                }
                let metadata = file_entry
                    .metadata()
                    .await
                    .map_err(|e| Error::read_io(e, &path))?;
                artifacts.push(ExportArtifact::new(&reason_dir, path, metadata.len()));
            }
        }

        artifacts.sort_by(|a, b| b.file_name.cmp(&a.file_name));
        Ok(artifacts)
    }
}

/// Write `content` so that no partially written file is ever visible under
/// the final name: write to a sibling temp file, then rename over the target.
async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    if let Err(err) = fs::write(&tmp, content).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Error::write_io(err, path));
    }
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Error::write_io(err, path));
    }
    Ok(())
}
