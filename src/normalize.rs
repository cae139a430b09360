use chrono::{NaiveDate, NaiveDateTime};

use crate::models::CanonicalRecord;
use crate::reconcile::ReconciledRow;

/// Parse a plain decimal number, `None` on failure.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|v| v as i64))
}

/// Parse a currency amount, tolerating a leading `$` and thousands
/// separators (`"$1,234.50"` -> `1234.5`).
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    cleaned.parse::<f64>().ok()
}

const DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M", "%d-%m-%Y %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse a timestamp using the day-first convention: ambiguous numeric
/// dates are read as day/month/year. Date-only inputs resolve to midnight.
pub fn parse_datetime_dayfirst(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert one reconciled row into a typed record.
///
/// Each field is coerced independently: a cell that fails to parse becomes
/// `None` without affecting its siblings, and the row is always emitted.
pub fn normalize(row: ReconciledRow) -> CanonicalRecord {
    CanonicalRecord {
        location: row.location.trim().to_string(),
        rating: parse_number(&row.rating),
        comment: row.comment,
        transaction_at: row
            .transaction_at
            .as_deref()
            .and_then(parse_datetime_dayfirst),
        transaction_value: parse_currency(&row.transaction_value),
        feedback_id: parse_integer(&row.feedback_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        location: &str,
        rating: &str,
        comment: &str,
        date: Option<&str>,
        value: &str,
        id: &str,
    ) -> ReconciledRow {
        ReconciledRow {
            location: location.to_string(),
            rating: rating.to_string(),
            comment: comment.to_string(),
            transaction_at: date.map(str::to_string),
            transaction_value: value.to_string(),
            feedback_id: id.to_string(),
        }
    }

    #[test]
    fn currency_strips_symbol_and_separators() {
        assert_eq!(parse_currency("$4.50"), Some(4.5));
        assert_eq!(parse_currency("$1,234.50"), Some(1234.5));
        assert_eq!(parse_currency("3.20"), Some(3.2));
        assert_eq!(parse_currency("four dollars"), None);
    }

    #[test]
    fn dates_parse_day_first() {
        let parsed = parse_datetime_dayfirst("01/03/2024").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let with_time = parse_datetime_dayfirst("15/06/2023 14:30:00").unwrap();
        assert_eq!(with_time.date(), NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());

        assert_eq!(parse_datetime_dayfirst("not-a-date"), None);
        assert_eq!(parse_datetime_dayfirst(""), None);
    }

    #[test]
    fn fully_valid_row_has_no_null_fields() {
        let record = normalize(row(
            "  Auckland Central ",
            "4",
            "Great coffee",
            Some("01/03/2024"),
            "$4.50",
            "1001",
        ));
        assert_eq!(record.location, "Auckland Central");
        assert_eq!(record.rating, Some(4.0));
        assert_eq!(record.comment, "Great coffee");
        assert_eq!(
            record.transaction_at.map(|dt| dt.date()),
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(record.transaction_value, Some(4.5));
        assert_eq!(record.feedback_id, Some(1001));
    }

    #[test]
    fn bad_date_nulls_only_the_date() {
        let record = normalize(row(
            "Hastings",
            "5",
            "Fine",
            Some("not-a-date"),
            "3.20",
            "1002",
        ));
        assert_eq!(record.transaction_at, None);
        assert_eq!(record.rating, Some(5.0));
        assert_eq!(record.transaction_value, Some(3.2));
        assert_eq!(record.feedback_id, Some(1002));
    }

    #[test]
    fn each_coercion_fails_independently() {
        let record = normalize(row("Nelson", "??", "", None, "n/a", "abc"));
        assert_eq!(record.location, "Nelson");
        assert_eq!(record.rating, None);
        assert_eq!(record.transaction_at, None);
        assert_eq!(record.transaction_value, None);
        assert_eq!(record.feedback_id, None);
    }
}
