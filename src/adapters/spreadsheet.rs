use crate::domain::model::SheetColumn;
use crate::utils::error::{ReconcileError, Result};
use csv::ReaderBuilder;

/// Header aliases accepted when no column is configured explicitly.
pub const DEFAULT_FILENAME_COLUMNS: &[&str] = &[
    "filename",
    "file name",
    "file_name",
    "pdf filename",
    "pdf_filename",
];

pub fn default_filename_columns() -> Vec<String> {
    DEFAULT_FILENAME_COLUMNS
        .iter()
        .map(|alias| alias.to_string())
        .collect()
}

/// `.tsv`/`.tab` 用 tab，其餘一律逗號
pub fn delimiter_for_path(path: &str) -> u8 {
    let lowered = path.to_ascii_lowercase();
    if lowered.ends_with(".tsv") || lowered.ends_with(".tab") {
        b'\t'
    } else {
        b','
    }
}

/// Pull the first column whose header matches one of `aliases`.
///
/// Header comparison trims whitespace and ignores case; a UTF-8 BOM on the
/// first header is dropped. Short rows yield an empty cell, which the
/// reconciler later skips.
pub fn read_filename_column(
    data: &[u8],
    delimiter: u8,
    aliases: &[String],
    source: &str,
) -> Result<SheetColumn> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let wanted: Vec<String> = aliases.iter().map(|a| a.trim().to_lowercase()).collect();

    let found = headers.iter().enumerate().find(|(_, header)| {
        let header = header.trim_start_matches('\u{feff}').trim().to_lowercase();
        wanted.iter().any(|alias| *alias == header)
    });

    let (index, header) = match found {
        Some((index, header)) => (index, header.trim_start_matches('\u{feff}').trim().to_string()),
        None => {
            tracing::debug!("Headers in {}: {:?}", source, headers);
            return Err(ReconcileError::ColumnNotFound {
                path: source.to_string(),
                aliases: aliases.to_vec(),
            });
        }
    };

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        values.push(record.get(index).unwrap_or("").to_string());
    }

    tracing::info!(
        "📑 Read {} rows from column '{}' in {}",
        values.len(),
        header,
        source
    );

    Ok(SheetColumn { header, values })
}
