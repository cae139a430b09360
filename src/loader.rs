use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::models::CanonicalRecord;
use crate::normalize::normalize;
use crate::reconcile::{reconcile_row, RepairPolicy};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_emitted: usize,
    pub rows_dropped: usize,
}

/// Load the sales export, reconcile row shapes, and normalize fields.
///
/// Only a failure to read the source file is fatal; every per-row anomaly is
/// handled locally by dropping the row or nulling the field. Re-running on
/// identical input yields identical records.
pub fn load_records(
    path: &Path,
    policy: &RepairPolicy,
) -> anyhow::Result<(Vec<CanonicalRecord>, LoadStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open sales export {}", path.display()))?;

    let mut records = Vec::new();
    let mut stats = LoadStats::default();

    for (index, result) in reader.records().enumerate() {
        let raw = result.with_context(|| format!("failed to read record {index}"))?;
        // First line is the header.
        if index == 0 {
            continue;
        }

        let values = present_values(&raw);
        stats.rows_read += 1;

        match reconcile_row(&values, policy) {
            Some(row) => {
                records.push(normalize(row));
                stats.rows_emitted += 1;
            }
            None => stats.rows_dropped += 1,
        }
    }

    info!(
        rows_read = stats.rows_read,
        rows_emitted = stats.rows_emitted,
        rows_dropped = stats.rows_dropped,
        "loaded sales export"
    );

    Ok((records, stats))
}

// The ragged export pads short rows with trailing commas; strip the empty
// tail so shape dispatch sees the true cell count.
fn present_values(record: &csv::StringRecord) -> Vec<String> {
    let mut values: Vec<String> = record.iter().map(str::to_string).collect();
    while values.last().is_some_and(|v| v.trim().is_empty()) {
        values.pop();
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Location,Rating,Comment,TransactionDateTime,TransactionValue,FeedbackID,,
Auckland Central,4,Great coffee,01/03/2024,$4.50,1001,,
Nelson,3,02/03/2024,3.20,1003,,,
Hastings,5,,02/03/2024,3.20,WEB,1002,
Dunedin,2,Noisy,WEB,03/03/2024,9999.00,S12,1004
Bad,1,x,y,z,1,2,3,4
";

    fn write_sample(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_and_reconciles_the_mixed_export() {
        let path = write_sample("cafe_sales_mixed.csv");
        let (records, stats) = load_records(&path, &RepairPolicy::default()).unwrap();

        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.rows_emitted, 4);
        assert_eq!(stats.rows_dropped, 1);
        assert_eq!(records.len(), stats.rows_emitted);

        let first = &records[0];
        assert_eq!(first.location, "Auckland Central");
        assert_eq!(first.rating, Some(4.0));
        assert_eq!(first.transaction_value, Some(4.5));
        assert_eq!(first.feedback_id, Some(1001));

        // Five-field row gains an empty comment.
        assert_eq!(records[1].location, "Nelson");
        assert_eq!(records[1].comment, "");

        // Eight-field row keeps its raw value; no outlier repair.
        assert_eq!(records[3].location, "Dunedin");
        assert_eq!(records[3].transaction_value, Some(9999.0));
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let path = write_sample("cafe_sales_idempotent.csv");
        let (first, _) = load_records(&path, &RepairPolicy::default()).unwrap();
        let (second, _) = load_records(&path, &RepairPolicy::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_a_fatal_error() {
        let path = std::env::temp_dir().join("cafe_sales_does_not_exist.csv");
        let result = load_records(&path, &RepairPolicy::default());
        assert!(result.is_err());
    }
}
