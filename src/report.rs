use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::analysis;
use crate::models::{CanonicalRecord, FeedbackEntry};

/// Star glyphs for a rating, e.g. `4` -> `★★★★☆`.
pub fn draw_stars(rating: f64) -> String {
    let filled = (rating as usize).min(5);
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub fn build_report(
    records: &[CanonicalRecord],
    regions: Option<&HashMap<String, String>>,
    since_days: i64,
    cutoff: NaiveDate,
) -> String {
    let revenue = analysis::revenue_summary(records);
    let daily = analysis::daily_revenue(records, cutoff);
    let by_location = analysis::revenue_by_location(records);
    let ratings = analysis::rating_summary(records);
    let top = analysis::top_feedback(records, 3);
    let bottom = analysis::bottom_feedback(records, 3);

    let mut output = String::new();

    let _ = writeln!(output, "# Cafe Sales Report");
    let _ = writeln!(
        output,
        "Covering transactions since {} (last {} days)",
        cutoff, since_days
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Revenue Breakdown");
    let _ = writeln!(output, "- Total sales: ${:.2}", revenue.total_sales);
    let _ = writeln!(output, "- Average sale: ${:.2}", revenue.average_sale);
    let _ = writeln!(output, "- Total orders: {}", revenue.total_orders);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Total Daily Revenue");
    if daily.is_empty() {
        let _ = writeln!(output, "No dated transactions in this window.");
    } else {
        let _ = writeln!(output, "| Day | Revenue |");
        let _ = writeln!(output, "|---|---|");
        for point in &daily {
            let _ = writeln!(output, "| {} | ${:.2} |", point.day, point.total);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Revenue by Location");
    if by_location.is_empty() {
        let _ = writeln!(output, "No transactions recorded.");
    } else {
        for row in &by_location {
            let _ = writeln!(
                output,
                "- {}: ${:.2} across {} orders",
                row.label, row.total, row.orders
            );
        }
    }

    if let Some(lookup) = regions {
        let by_region = analysis::revenue_by_region(records, lookup);
        let _ = writeln!(output);
        let _ = writeln!(output, "## Revenue by Region");
        for row in &by_region {
            let _ = writeln!(
                output,
                "- {}: ${:.2} across {} orders",
                row.label, row.total, row.orders
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Customer Ratings");
    if ratings.total_reviews == 0 {
        let _ = writeln!(output, "No rated transactions.");
    } else {
        let _ = writeln!(
            output,
            "Average {:.1} {} over {} reviews",
            ratings.average,
            draw_stars(ratings.average),
            ratings.total_reviews
        );
        for star in (1..=5).rev() {
            let _ = writeln!(
                output,
                "- {} {}: {}",
                star,
                draw_stars(star as f64),
                ratings.star_counts[star - 1]
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Positive Feedback");
    write_feedback(&mut output, &top);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Areas for Improvement");
    write_feedback(&mut output, &bottom);

    output
}

fn write_feedback(output: &mut String, entries: &[FeedbackEntry]) {
    if entries.is_empty() {
        let _ = writeln!(output, "No rated feedback in this window.");
        return;
    }
    for entry in entries {
        let date = entry
            .transaction_at
            .map(|dt| dt.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        let _ = writeln!(
            output,
            "- **{}** {} — *{}* ({})",
            entry.location,
            draw_stars(entry.rating),
            entry.comment,
            date
        );
    }
}
