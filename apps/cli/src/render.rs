//! Plain-text rendering of run summaries and listings.
//!
//! Every export/import run ends in exactly one consolidated summary: counts
//! first, then up to [`MAX_ERROR_DETAILS`] failure details.

use lossbook_core::entries::{Entry, LossAggregate, ReasonLossBreakdown};
use lossbook_core::export::{ExportArtifact, ExportSummary};
use lossbook_core::import::ImportSummary;
use lossbook_core::products::Product;
use lossbook_core::reasons::Reason;

/// Error details shown before truncating.
pub const MAX_ERROR_DETAILS: usize = 5;

pub fn export_summary(summary: &ExportSummary) -> String {
    if summary.nothing_pending() {
        return "Nothing pending: every entry has already been exported.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Export finished: {} of {} reasons exported, {} failed.\n",
        summary.successful_exports, summary.total_reasons, summary.failed_exports
    ));
    for file in &summary.exported_files {
        out.push_str(&format!(
            "  reason {}: {} entries -> {}\n",
            file.reason_code,
            file.entries_count,
            file.path.display()
        ));
    }
    if !summary.errors.is_empty() {
        out.push_str("Failures:\n");
        for failure in summary.errors.iter().take(MAX_ERROR_DETAILS) {
            out.push_str(&format!(
                "  reason {}: {}\n",
                failure.reason_code, failure.message
            ));
        }
        let hidden = summary.errors.len().saturating_sub(MAX_ERROR_DETAILS);
        if hidden > 0 {
            out.push_str(&format!("  ...and {hidden} more\n"));
        }
    }
    out.trim_end().to_string()
}

pub fn import_summary(summary: &ImportSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Import of {} finished: {} of {} lines imported, {} failed.\n",
        summary.file_name, summary.imported, summary.total_lines, summary.failed
    ));
    if !summary.failures.is_empty() {
        out.push_str("Failures:\n");
        for failure in summary.failures.iter().take(MAX_ERROR_DETAILS) {
            out.push_str(&format!(
                "  line {}: {} ({})\n",
                failure.line_number, failure.message, failure.content
            ));
        }
        let hidden = summary.failures.len().saturating_sub(MAX_ERROR_DETAILS);
        if hidden > 0 {
            out.push_str(&format!("  ...and {hidden} more\n"));
        }
    }
    out.trim_end().to_string()
}

pub fn entry_row(entry: &Entry) -> String {
    let sync_marker = if entry.is_synchronized { "sent" } else { "pending" };
    format!(
        "#{:<5} {:<16} {:<28} qty {:>8}  cost {:>8}  reason {}  [{sync_marker}]  {}",
        entry.id,
        entry.product_code,
        entry.product_name,
        entry.quantity,
        entry.unit_cost,
        entry.reason_id,
        entry.created_at.format("%Y-%m-%d %H:%M"),
    )
}

pub fn loss_report(aggregate: &LossAggregate, breakdown: &[ReasonLossBreakdown]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Entries: {}  Quantity: {}  Loss value: {:.2}\n",
        aggregate.entry_count, aggregate.total_quantity, aggregate.total_value
    ));
    for row in breakdown {
        out.push_str(&format!(
            "  {} {:<32} {:>5} entries  value {:>10.2}\n",
            row.reason_code, row.reason_description, row.entry_count, row.total_value
        ));
    }
    out.trim_end().to_string()
}

pub fn reason_row(reason: &Reason) -> String {
    let state = if reason.is_active { "" } else { " (inactive)" };
    format!("{} {}{state}", reason.code, reason.description)
}

pub fn product_row(product: &Product) -> String {
    let club = product
        .club_price
        .map(|price| format!("  club {price:.2}"))
        .unwrap_or_default();
    format!(
        "{:<16} {:<32} {}  price {:.2}{club}",
        product.code,
        product.name,
        product.unit_type.as_db_str(),
        product.regular_price,
    )
}

pub fn artifact_row(artifact: &ExportArtifact) -> String {
    format!(
        "{}/{}  ({} bytes)",
        artifact.reason_dir, artifact.file_name, artifact.size_bytes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lossbook_core::export::ExportFailure;
    use lossbook_core::import::LineFailure;

    #[test]
    fn empty_export_reports_nothing_pending() {
        let summary = ExportSummary::new(8);
        assert!(export_summary(&summary).contains("Nothing pending"));
    }

    #[test]
    fn export_failures_are_truncated() {
        let mut summary = ExportSummary::new(10);
        summary.failed_exports = 7;
        for i in 0..7 {
            summary.errors.push(ExportFailure {
                reason_code: format!("{i:02}"),
                message: "disk full".to_string(),
            });
        }
        let text = export_summary(&summary);
        assert!(text.contains("...and 2 more"));
    }

    #[test]
    fn import_summary_names_line_numbers() {
        let mut summary = ImportSummary::new("batch.txt", 3);
        summary.imported = 2;
        summary.failed = 1;
        summary.failures.push(LineFailure {
            line_number: 2,
            content: "bad".to_string(),
            message: "expected 5 fields, found 1".to_string(),
        });
        let text = import_summary(&summary);
        assert!(text.contains("line 2"));
        assert!(text.contains("2 of 3 lines imported"));
    }
}
