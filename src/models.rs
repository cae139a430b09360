use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One cleaned point-of-sale record in the fixed canonical field order.
///
/// Numeric and date fields are `None` when the source cell failed coercion;
/// the record itself is always kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub location: String,
    pub rating: Option<f64>,
    pub comment: String,
    pub transaction_at: Option<NaiveDateTime>,
    pub transaction_value: Option<f64>,
    pub feedback_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct LocationRevenue {
    pub label: String,
    pub total: f64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct RevenueSummary {
    pub total_sales: f64,
    pub average_sale: f64,
    pub total_orders: usize,
}

#[derive(Debug, Clone)]
pub struct RatingSummary {
    pub average: f64,
    pub total_reviews: usize,
    /// Counts per star, index 0 = one star .. index 4 = five stars.
    pub star_counts: [usize; 5],
}

#[derive(Debug, Clone)]
pub struct FeedbackEntry {
    pub location: String,
    pub rating: f64,
    pub comment: String,
    pub transaction_at: Option<NaiveDateTime>,
}
