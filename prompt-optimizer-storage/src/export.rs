use prompt_optimizer_core::{OptimizationRecord, Result};
use std::path::Path;
use tracing::info;

pub const CSV_HEADERS: [&str; 7] = [
    "timestamp",
    "category",
    "original_prompt",
    "optimized_prompt",
    "original_score",
    "optimized_score",
    "improvement",
];

/// Render records as CSV, one row per run.
pub fn to_csv(records: &[OptimizationRecord]) -> String {
    let mut out = CSV_HEADERS.join(",");
    out.push('\n');

    for record in records {
        let row = [
            record.timestamp.to_rfc3339(),
            record.category.as_str().to_string(),
            escape_field(&record.original_prompt),
            escape_field(&record.winning_prompt),
            format!("{:.2}", record.original_total),
            format!("{:.2}", record.winner_total),
            format!("{:.2}", record.improvement),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Write [`to_csv`] output to `path`, returning the number of data rows.
pub async fn export_csv(records: &[OptimizationRecord], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, to_csv(records)).await?;

    info!(path = %path.display(), rows = records.len(), "Exported run history");
    Ok(records.len())
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field_is_untouched() {
        assert_eq!(escape_field("explain rust"), "explain rust");
    }

    #[test]
    fn test_field_with_comma_is_quoted() {
        assert_eq!(escape_field("a, b"), "\"a, b\"");
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_newline_is_quoted() {
        assert_eq!(escape_field("line\nnext"), "\"line\nnext\"");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        assert_eq!(
            to_csv(&[]),
            "timestamp,category,original_prompt,optimized_prompt,original_score,optimized_score,improvement\n"
        );
    }
}
