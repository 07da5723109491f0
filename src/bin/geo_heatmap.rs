//! Geographic heatmaps of pickups and dropoffs per taxi zone. Counts are
//! log-scaled before shading since a handful of airport zones dwarf the rest.
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripscraper::stats::{self, LocationStatsRow};
use tripscraper::{geo, plot};

const LOCATION_STATS: &str = "stats/location_stats.csv";
const ZONES_GEOJSON: &str = "analytics/shapefile.geojson";
const PICKUPS_PNG: &str = "plots/pickups_heatmap.png";
const DROPOFFS_PNG: &str = "plots/dropoffs_heatmap.png";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let rows = stats::load_location_stats(Path::new(LOCATION_STATS))?;
    let zones = geo::load_zones(Path::new(ZONES_GEOJSON))?;
    info!("{} stat rows across {} zones", rows.len(), zones.len());

    std::fs::create_dir_all("plots")?;
    render(
        &zones,
        &rows,
        |r| r.num_pickups,
        "NYC Heatmap of Pickups (Log scale)",
        "Number of Pickups",
        Path::new(PICKUPS_PNG),
    )?;
    render(
        &zones,
        &rows,
        |r| r.num_dropoffs,
        "NYC Heatmap of Dropoffs (Log scale)",
        "Number of Dropoffs",
        Path::new(DROPOFFS_PNG),
    )?;
    Ok(())
}

fn render(
    zones: &[geo::Zone],
    rows: &[LocationStatsRow],
    count: impl Fn(&LocationStatsRow) -> u64,
    title: &str,
    legend_label: &str,
    out: &Path,
) -> Result<()> {
    let values: HashMap<i64, f64> = rows
        .iter()
        .map(|r| (r.location_id, stats::log_scaled(count(r))))
        .collect();
    let (shaded, backdrop) = geo::merge(zones, &values);
    plot::choropleth(out, title, legend_label, &shaded, &backdrop)?;
    info!("wrote {}", out.display());
    Ok(())
}
