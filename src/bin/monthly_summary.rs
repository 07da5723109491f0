//! Two-panel summary figure from the trip-stats table: monthly average
//! duration/fare/tip on top, a histogram of monthly trip counts below.
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripscraper::plot::{self, Series};
use tripscraper::stats;

const TRIP_STATS: &str = "stats/trip_stats.csv";
const OUT_PNG: &str = "plots/monthly_summary.png";
const HISTOGRAM_BINS: usize = 20;

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let rows = stats::load_trip_stats(Path::new(TRIP_STATS))?;
    let monthly = stats::monthly_rollup(&rows);
    info!("{} rows rolled up into {} months", rows.len(), monthly.len());

    let series = vec![
        Series {
            label: "Avg Trip Duration (min)".to_string(),
            color: BLUE,
            points: monthly
                .iter()
                .map(|m| (m.month, m.avg_trip_duration_minutes))
                .collect(),
        },
        Series {
            label: "Avg Amount ($)".to_string(),
            color: GREEN,
            points: monthly.iter().map(|m| (m.month, m.avg_amount)).collect(),
        },
        Series {
            label: "Avg Tip ($)".to_string(),
            color: RED,
            points: monthly.iter().map(|m| (m.month, m.avg_tip)).collect(),
        },
    ];
    let counts: Vec<f64> = monthly.iter().map(|m| m.trip_count as f64).collect();

    let out = Path::new(OUT_PNG);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(out, (1200, 1600)).into_drawing_area();
    root.fill(&WHITE)?;
    let (top, bottom) = root.split_vertically(800);
    plot::draw_time_series(
        &top,
        "Monthly Average - Trip Duration, Amount, and Tip",
        "Value",
        &series,
    )?;
    plot::draw_histogram(
        &bottom,
        "Histogram of Monthly Trip Counts",
        "Monthly Trip Count",
        &counts,
        HISTOGRAM_BINS,
    )?;
    root.present()?;

    info!("wrote {}", out.display());
    Ok(())
}
