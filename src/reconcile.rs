use tracing::{debug, warn};

use crate::normalize::{parse_currency, parse_datetime_dayfirst};

/// A raw row realigned to the six canonical positions, still untyped.
///
/// `transaction_at` is optional so the seven-field repair can null an
/// unparseable date instead of carrying the bad literal forward.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    pub location: String,
    pub rating: String,
    pub comment: String,
    pub transaction_at: Option<String>,
    pub transaction_value: String,
    pub feedback_id: String,
}

/// Repair knobs for the seven-field export path.
#[derive(Debug, Clone)]
pub struct RepairPolicy {
    /// Transaction values above this are treated as scanner artifacts and
    /// zeroed. Applies only to seven-field rows.
    pub outlier_threshold: f64,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            outlier_threshold: 1000.0,
        }
    }
}

/// The known export layouts, keyed by how many cells a row carries.
///
/// The source file mixes four export paths: standard POS rows, rows with the
/// comment column omitted, rows with an extra noise column, and web-channel
/// rows carrying channel and store metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// Six cells, already in canonical order.
    Canonical,
    /// Five cells, comment column omitted.
    MissingComment,
    /// Seven cells, duplicate/noise column at index 5.
    ExtraColumn,
    /// Eight cells: `[location, rating, comment, channel, date, value, store, id]`.
    WebExport,
}

impl RowShape {
    pub fn classify(field_count: usize) -> Option<RowShape> {
        match field_count {
            5 => Some(RowShape::MissingComment),
            6 => Some(RowShape::Canonical),
            7 => Some(RowShape::ExtraColumn),
            8 => Some(RowShape::WebExport),
            _ => None,
        }
    }
}

/// Realign one raw row to the canonical six positions.
///
/// Rows whose cell count matches no known layout are dropped, never
/// partially emitted. No final type conversion happens here; only the
/// seven-field repair steps touch cell values.
pub fn reconcile_row(values: &[String], policy: &RepairPolicy) -> Option<ReconciledRow> {
    let shape = match RowShape::classify(values.len()) {
        Some(shape) => shape,
        None => {
            warn!(
                field_count = values.len(),
                first = values.first().map(String::as_str).unwrap_or(""),
                "dropping row with unrecognized shape"
            );
            return None;
        }
    };

    let row = match shape {
        RowShape::Canonical => ReconciledRow {
            location: values[0].clone(),
            rating: values[1].clone(),
            comment: values[2].clone(),
            transaction_at: Some(values[3].clone()),
            transaction_value: values[4].clone(),
            feedback_id: values[5].clone(),
        },
        RowShape::MissingComment => ReconciledRow {
            location: values[0].clone(),
            rating: values[1].clone(),
            comment: String::new(),
            transaction_at: Some(values[2].clone()),
            transaction_value: values[3].clone(),
            feedback_id: values[4].clone(),
        },
        RowShape::ExtraColumn => {
            debug!(location = %values[0], "repairing seven-field row");
            ReconciledRow {
                location: values[0].clone(),
                rating: values[1].clone(),
                comment: values[2].clone(),
                transaction_at: repair_date(&values[3]),
                transaction_value: repair_value(&values[4], policy),
                feedback_id: values[6].clone(),
            }
        }
        RowShape::WebExport => ReconciledRow {
            location: values[0].clone(),
            rating: values[1].clone(),
            comment: values[2].clone(),
            transaction_at: Some(values[4].clone()),
            transaction_value: values[5].clone(),
            feedback_id: values[7].clone(),
        },
    };

    Some(row)
}

// Seven-field rows often carry a garbled date; null it here rather than
// letting the bad literal ride through to normalization.
fn repair_date(raw: &str) -> Option<String> {
    if parse_datetime_dayfirst(raw).is_some() {
        Some(raw.to_string())
    } else {
        None
    }
}

// A value that fails currency parsing, or parses above the outlier
// threshold, is a scanning artifact: coerce it to zero, keep the row.
fn repair_value(raw: &str, policy: &RepairPolicy) -> String {
    match parse_currency(raw) {
        Some(value) if value <= policy.outlier_threshold => raw.to_string(),
        Some(value) => {
            debug!(value, threshold = policy.outlier_threshold, "zeroing outlier value");
            "0".to_string()
        }
        None => "0".to_string(),
    }
}
