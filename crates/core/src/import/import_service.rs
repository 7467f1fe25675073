use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use tokio::fs;

use crate::entries::{EntryRepositoryTrait, NewEntry};
use crate::errors::{Error, Result};
use crate::export::format;
use crate::products::{NewProduct, ProductRepositoryTrait};
use crate::reasons::DEFAULT_IMPORT_REASON_ID;

use super::{ImportRunRepositoryTrait, ImportSummary, LineFailure, NewImportRun};

/// Re-ingests exported flat files.
///
/// Every line is an independent unit of work: a malformed line is recorded
/// with its line number and the batch continues. Imported entries are
/// terminal — they land already synchronized and are never re-exported.
pub struct ImportService {
    product_repository: Arc<dyn ProductRepositoryTrait>,
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    import_run_repository: Arc<dyn ImportRunRepositoryTrait>,
}

impl ImportService {
    pub fn new(
        product_repository: Arc<dyn ProductRepositoryTrait>,
        entry_repository: Arc<dyn EntryRepositoryTrait>,
        import_run_repository: Arc<dyn ImportRunRepositoryTrait>,
    ) -> Self {
        Self {
            product_repository,
            entry_repository,
            import_run_repository,
        }
    }

    /// Import one file. Fails outright only on batch-level problems: the
    /// path does not resolve to a readable regular file, or it contains no
    /// non-empty lines.
    pub async fn import_file(&self, path: &Path) -> Result<ImportSummary> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| Error::read_io(e, path))?;
        if !metadata.is_file() {
            return Err(Error::not_found(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::read_io(e, path))?;

        let lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return Err(Error::format("empty file"));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("importing {} lines from {file_name}", lines.len());

        let mut summary = ImportSummary::new(file_name.clone(), lines.len());
        for (line_number, raw) in lines {
            match self.import_line(raw, &file_name).await {
                Ok(()) => summary.imported += 1,
                Err(err) => {
                    warn!("{file_name}:{line_number}: {err}");
                    summary.failed += 1;
                    summary.failures.push(LineFailure {
                        line_number,
                        content: raw.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        self.import_run_repository
            .record(NewImportRun::from_summary(&summary)?)
            .await?;

        info!(
            "import finished: {} imported, {} failed",
            summary.imported, summary.failed
        );
        Ok(summary)
    }

    async fn import_line(&self, raw: &str, file_name: &str) -> Result<()> {
        let parsed = format::parse_line(raw)?;

        // Unknown codes get a placeholder catalog row; never a line failure.
        if self
            .product_repository
            .find_by_code(&parsed.product_code)?
            .is_none()
        {
            self.product_repository
                .upsert(NewProduct::placeholder(
                    parsed.product_code.clone(),
                    parsed.product_name.clone(),
                ))
                .await?;
        }

        let new_entry = NewEntry {
            product_code: parsed.product_code,
            product_name: Some(parsed.product_name),
            reason_id: DEFAULT_IMPORT_REASON_ID.to_string(),
            quantity: parsed.quantity,
            unit_cost: parsed.unit_cost,
            notes: Some(format!("Imported from {file_name}")),
            synchronized: true,
            created_at: Some(parsed.recorded_at.unwrap_or_else(Utc::now)),
        };
        new_entry.validate()?;
        self.entry_repository.insert(new_entry).await?;
        Ok(())
    }
}
