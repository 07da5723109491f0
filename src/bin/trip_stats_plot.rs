//! Renders the trip-stats table as one multi-series time-series chart:
//! passengers, distance, duration, fare and tip per month.
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripscraper::plot::{self, Series};
use tripscraper::stats::{self, TripStatsRow};

const TRIP_STATS: &str = "stats/trip_stats.csv";
const OUT_PNG: &str = "plots/trip_stats.png";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let rows = stats::load_trip_stats(Path::new(TRIP_STATS))?;
    info!("{} rows of trip stats", rows.len());

    let series = vec![
        column("Average # of Passengers", BLUE, &rows, |r| r.avg_passengers),
        column("Average Trip Distance (Miles)", GREEN, &rows, |r| {
            r.avg_trip_distance_miles
        }),
        column("Average Trip Duration (Minutes)", RED, &rows, |r| {
            r.avg_trip_duration_minutes
        }),
        column("Average $ Amount", MAGENTA, &rows, |r| r.avg_amount),
        column("Average $ Tip", CYAN, &rows, |r| r.avg_tip),
    ];

    let out = Path::new(OUT_PNG);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    plot::time_series_chart(out, "Trip Stats Over Time", "Values", &series)?;
    info!("wrote {}", out.display());
    Ok(())
}

fn column(
    label: &str,
    color: RGBColor,
    rows: &[TripStatsRow],
    value: impl Fn(&TripStatsRow) -> f64,
) -> Series {
    Series {
        label: label.to_string(),
        color,
        points: rows.iter().map(|r| (r.month_start, value(r))).collect(),
    }
}
