use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};

use crate::models::{
    CanonicalRecord, DailyRevenue, FeedbackEntry, LocationRevenue, RatingSummary, RevenueSummary,
};

pub fn cutoff_date(since_days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(since_days.max(1))
}

/// Sum transaction value per location, largest total first.
pub fn revenue_by_location(records: &[CanonicalRecord]) -> Vec<LocationRevenue> {
    group_revenue(records, |record| Some(record.location.clone()))
}

/// Sum transaction value per region, using an externally supplied
/// location-to-region lookup. Locations without a mapping bucket together.
pub fn revenue_by_region(
    records: &[CanonicalRecord],
    regions: &HashMap<String, String>,
) -> Vec<LocationRevenue> {
    group_revenue(records, |record| {
        Some(
            regions
                .get(&record.location)
                .cloned()
                .unwrap_or_else(|| "Unmapped".to_string()),
        )
    })
}

fn group_revenue(
    records: &[CanonicalRecord],
    key: impl Fn(&CanonicalRecord) -> Option<String>,
) -> Vec<LocationRevenue> {
    let mut totals: HashMap<String, (f64, usize)> = HashMap::new();

    for record in records {
        let Some(label) = key(record) else { continue };
        let entry = totals.entry(label).or_insert((0.0, 0));
        entry.0 += record.transaction_value.unwrap_or(0.0);
        entry.1 += 1;
    }

    let mut rows: Vec<LocationRevenue> = totals
        .into_iter()
        .map(|(label, (total, orders))| LocationRevenue {
            label,
            total,
            orders,
        })
        .collect();

    rows.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

/// Total revenue per calendar day since `cutoff`, with days in between
/// filled with zero so the trend line has no gaps. Records without a
/// parseable timestamp are excluded.
pub fn daily_revenue(records: &[CanonicalRecord], cutoff: NaiveDate) -> Vec<DailyRevenue> {
    let mut totals: HashMap<NaiveDate, f64> = HashMap::new();

    for record in records {
        let Some(timestamp) = record.transaction_at else { continue };
        let day = timestamp.date();
        if day < cutoff {
            continue;
        }
        *totals.entry(day).or_insert(0.0) += record.transaction_value.unwrap_or(0.0);
    }

    let Some(first) = totals.keys().min().copied() else {
        return Vec::new();
    };
    let last = totals.keys().max().copied().unwrap_or(first);

    let mut series = Vec::new();
    let mut day = first;
    while day <= last {
        series.push(DailyRevenue {
            day,
            total: totals.get(&day).copied().unwrap_or(0.0),
        });
        day += Duration::days(1);
    }
    series
}

/// Total, average, and order count over transaction values. The average is
/// taken over records with a parseable value only.
pub fn revenue_summary(records: &[CanonicalRecord]) -> RevenueSummary {
    let values: Vec<f64> = records.iter().filter_map(|r| r.transaction_value).collect();
    let total_sales: f64 = values.iter().sum();
    let average_sale = if values.is_empty() {
        0.0
    } else {
        total_sales / values.len() as f64
    };

    RevenueSummary {
        total_sales,
        average_sale,
        total_orders: records.len(),
    }
}

/// Average rating and per-star counts over records with a parseable rating.
pub fn rating_summary(records: &[CanonicalRecord]) -> RatingSummary {
    let mut star_counts = [0usize; 5];
    let mut sum = 0.0;
    let mut reviews = 0usize;

    for record in records {
        let Some(rating) = record.rating else { continue };
        sum += rating;
        reviews += 1;
        let star = rating as usize;
        if (1..=5).contains(&star) {
            star_counts[star - 1] += 1;
        }
    }

    RatingSummary {
        average: if reviews == 0 { 0.0 } else { sum / reviews as f64 },
        total_reviews: reviews,
        star_counts,
    }
}

/// Highest-rated feedback first. Records without a rating are skipped.
pub fn top_feedback(records: &[CanonicalRecord], limit: usize) -> Vec<FeedbackEntry> {
    let mut entries = rated_entries(records);
    entries.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(limit);
    entries
}

/// Lowest-rated feedback first.
pub fn bottom_feedback(records: &[CanonicalRecord], limit: usize) -> Vec<FeedbackEntry> {
    let mut entries = rated_entries(records);
    entries.sort_by(|a, b| a.rating.partial_cmp(&b.rating).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(limit);
    entries
}

fn rated_entries(records: &[CanonicalRecord]) -> Vec<FeedbackEntry> {
    records
        .iter()
        .filter_map(|record| {
            record.rating.map(|rating| FeedbackEntry {
                location: record.location.clone(),
                rating,
                comment: record.comment.clone(),
                transaction_at: record.transaction_at,
            })
        })
        .collect()
}
