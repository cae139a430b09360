use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod analysis;
mod loader;
mod models;
mod normalize;
mod reconcile;
mod regions;
mod report;

use reconcile::RepairPolicy;

#[derive(Parser)]
#[command(name = "cafe-sales-insights")]
#[command(about = "Normalizes a ragged cafe sales export and reports on it", long_about = None)]
struct Cli {
    /// Transaction values above this are zeroed in the seven-field repair path
    #[arg(long, default_value_t = 1000.0, global = true)]
    outlier_threshold: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the export and print row counts and a sample
    Inspect {
        #[arg(long)]
        csv: PathBuf,
        /// Dump the full normalized dataset as JSON instead of a sample
        #[arg(long)]
        json: bool,
    },
    /// Revenue figures: totals, daily trend, per-location breakdown
    Revenue {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 730)]
        since_days: i64,
        #[arg(long)]
        regions: Option<PathBuf>,
    },
    /// Rating distribution and best/worst feedback
    Feedback {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
    /// Generate the full markdown report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        regions: Option<PathBuf>,
        #[arg(long, default_value_t = 730)]
        since_days: i64,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let policy = RepairPolicy {
        outlier_threshold: cli.outlier_threshold,
    };

    match cli.command {
        Commands::Inspect { csv, json } => {
            let (records, stats) = loader::load_records(&csv, &policy)?;
            println!(
                "Read {} rows: {} emitted, {} dropped.",
                stats.rows_read, stats.rows_emitted, stats.rows_dropped
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in records.iter().take(5) {
                    println!("- {record:?}");
                }
            }
        }
        Commands::Revenue {
            csv,
            since_days,
            regions,
        } => {
            let (records, _) = loader::load_records(&csv, &policy)?;
            let summary = analysis::revenue_summary(&records);
            println!("Total sales: ${:.2}", summary.total_sales);
            println!("Average sale: ${:.2}", summary.average_sale);
            println!("Total orders: {}", summary.total_orders);

            println!("Revenue by location:");
            for row in analysis::revenue_by_location(&records) {
                println!("- {}: ${:.2} across {} orders", row.label, row.total, row.orders);
            }

            if let Some(path) = regions {
                let lookup = regions::load_region_lookup(&path)?;
                println!("Revenue by region:");
                for row in analysis::revenue_by_region(&records, &lookup) {
                    println!("- {}: ${:.2} across {} orders", row.label, row.total, row.orders);
                }
            }

            let cutoff = analysis::cutoff_date(since_days);
            let daily = analysis::daily_revenue(&records, cutoff);
            if daily.is_empty() {
                println!("No dated transactions since {cutoff}.");
            } else {
                println!("Daily revenue since {cutoff}:");
                for point in daily {
                    println!("- {}: ${:.2}", point.day, point.total);
                }
            }
        }
        Commands::Feedback { csv, limit } => {
            let (records, _) = loader::load_records(&csv, &policy)?;
            let ratings = analysis::rating_summary(&records);

            if ratings.total_reviews == 0 {
                println!("No rated transactions.");
                return Ok(());
            }

            println!(
                "Average rating {:.1} {} over {} reviews",
                ratings.average,
                report::draw_stars(ratings.average),
                ratings.total_reviews
            );
            for star in (1..=5).rev() {
                println!(
                    "{} {}: {}",
                    star,
                    report::draw_stars(star as f64),
                    ratings.star_counts[star - 1]
                );
            }

            println!("Top positive feedback:");
            for entry in analysis::top_feedback(&records, limit) {
                println!(
                    "- {} {} {}",
                    entry.location,
                    report::draw_stars(entry.rating),
                    entry.comment
                );
            }
            println!("Areas for improvement:");
            for entry in analysis::bottom_feedback(&records, limit) {
                println!(
                    "- {} {} {}",
                    entry.location,
                    report::draw_stars(entry.rating),
                    entry.comment
                );
            }
        }
        Commands::Report {
            csv,
            regions,
            since_days,
            out,
        } => {
            let (records, _) = loader::load_records(&csv, &policy)?;
            let lookup = match regions {
                Some(path) => Some(regions::load_region_lookup(&path)?),
                None => None,
            };
            let cutoff = analysis::cutoff_date(since_days);
            let report = report::build_report(&records, lookup.as_ref(), since_days, cutoff);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
