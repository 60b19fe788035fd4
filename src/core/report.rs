use crate::domain::model::ReconciliationReport;
use std::fmt::Write;

pub const REPORT_FILE: &str = "reconciliation_report.json";

/// Console summary: counts first, then the unmatched names from each side.
pub fn render_summary(report: &ReconciliationReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    let _ = writeln!(out, "📋 Reconciliation Summary");
    let _ = writeln!(
        out,
        "  Spreadsheet: {} (column '{}')",
        report.sheet_path, report.filename_column
    );
    let prefix = if report.blob_prefix.is_empty() {
        "(all)"
    } else {
        report.blob_prefix.as_str()
    };
    let _ = writeln!(out, "  Blob prefix: {}", prefix);
    let _ = writeln!(
        out,
        "  Spreadsheet rows: {} ({} unique)",
        result.total_a, result.unique_a
    );
    let _ = writeln!(
        out,
        "  Blob objects: {} ({} unique)",
        result.total_b, result.unique_b
    );
    let _ = writeln!(out, "  Matched: {}", result.matched_count);

    write_section(&mut out, "Only in spreadsheet", &result.only_in_a);
    write_section(&mut out, "Only in blob store", &result.only_in_b);

    if result.only_in_a.is_empty() && result.only_in_b.is_empty() {
        let _ = writeln!(out, "✅ Spreadsheet and blob store agree");
    }

    out
}

fn write_section(out: &mut String, title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "⚠️ {} ({}):", title, names.len());
    for name in names {
        let _ = writeln!(out, "  - {}", name);
    }
}
