// src/stats/mod.rs
//
// Loaders for the externally produced aggregate tables consumed by the
// plotting binaries. The tables are read-only inputs; nothing here mutates
// or writes them back.
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One row of the monthly trip-stats table.
#[derive(Debug, Clone, Deserialize)]
pub struct TripStatsRow {
    pub month_start: NaiveDate,
    pub avg_passengers: f64,
    pub avg_trip_distance_miles: f64,
    pub avg_trip_duration_minutes: f64,
    pub avg_amount: f64,
    pub avg_tip: f64,
    pub trip_count: u64,
}

/// One row of the per-zone location-stats table.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationStatsRow {
    pub location_id: i64,
    pub num_pickups: u64,
    pub num_dropoffs: u64,
}

/// Monthly aggregate of trip stats: per-trip averages are meaned across the
/// rows of the month, trip counts are summed.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAgg {
    pub month: NaiveDate,
    pub avg_trip_duration_minutes: f64,
    pub avg_amount: f64,
    pub avg_tip: f64,
    pub trip_count: u64,
}

/// Load the trip-stats table, sorted by `month_start`.
pub fn load_trip_stats(path: &Path) -> Result<Vec<TripStatsRow>> {
    let mut rows = read_csv::<TripStatsRow>(path)?;
    rows.sort_by_key(|r| r.month_start);
    Ok(rows)
}

/// Load the location-stats table.
pub fn load_location_stats(path: &Path) -> Result<Vec<LocationStatsRow>> {
    read_csv::<LocationStatsRow>(path)
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening table {}", path.display()))?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row.with_context(|| format!("parsing row of {}", path.display()))?);
    }
    Ok(rows)
}

/// Group trip-stats rows by calendar month.
pub fn monthly_rollup(rows: &[TripStatsRow]) -> Vec<MonthlyAgg> {
    let mut buckets: BTreeMap<(i32, u32), (f64, f64, f64, u64, u64)> = BTreeMap::new();
    for row in rows {
        let key = (row.month_start.year(), row.month_start.month());
        let bucket = buckets.entry(key).or_default();
        bucket.0 += row.avg_trip_duration_minutes;
        bucket.1 += row.avg_amount;
        bucket.2 += row.avg_tip;
        bucket.3 += row.trip_count;
        bucket.4 += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month), (duration, amount, tip, trips, n))| {
            let n = n as f64;
            MonthlyAgg {
                // key came from a valid date, so the first of that month exists
                month: NaiveDate::from_ymd_opt(year, month, 1).expect("valid month key"),
                avg_trip_duration_minutes: duration / n,
                avg_amount: amount / n,
                avg_tip: tip / n,
                trip_count: trips,
            }
        })
        .collect()
}

/// Natural log of a count, with zeros clamped to one so empty zones map to
/// 0.0 instead of minus infinity.
pub fn log_scaled(count: u64) -> f64 {
    (count.max(1) as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn row(date: &str, duration: f64, amount: f64, tip: f64, trips: u64) -> TripStatsRow {
        TripStatsRow {
            month_start: date.parse().unwrap(),
            avg_passengers: 1.5,
            avg_trip_distance_miles: 3.0,
            avg_trip_duration_minutes: duration,
            avg_amount: amount,
            avg_tip: tip,
            trip_count: trips,
        }
    }

    #[test]
    fn loads_and_sorts_trip_stats() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(
            tmp,
            "month_start,avg_passengers,avg_trip_distance_miles,avg_trip_duration_minutes,avg_amount,avg_tip,trip_count\n\
             2023-02-01,1.4,3.1,14.2,21.5,3.1,290000\n\
             2023-01-01,1.5,2.9,13.8,20.9,2.9,310000"
        )?;
        let rows = load_trip_stats(tmp.path())?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month_start, "2023-01-01".parse::<NaiveDate>()?);
        assert_eq!(rows[1].trip_count, 290000);
        Ok(())
    }

    #[test]
    fn loads_location_stats() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(
            tmp,
            "location_id,num_pickups,num_dropoffs\n132,120000,90000\n1,0,15"
        )?;
        let rows = load_location_stats(tmp.path())?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location_id, 132);
        assert_eq!(rows[1].num_pickups, 0);
        Ok(())
    }

    #[test]
    fn rollup_means_averages_and_sums_counts() {
        let rows = vec![
            row("2023-01-01", 10.0, 20.0, 2.0, 100),
            row("2023-01-15", 20.0, 30.0, 4.0, 50),
            row("2023-02-01", 12.0, 22.0, 3.0, 80),
        ];
        let agg = monthly_rollup(&rows);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].month, "2023-01-01".parse::<NaiveDate>().unwrap());
        assert_eq!(agg[0].avg_trip_duration_minutes, 15.0);
        assert_eq!(agg[0].avg_amount, 25.0);
        assert_eq!(agg[0].avg_tip, 3.0);
        assert_eq!(agg[0].trip_count, 150);
        assert_eq!(agg[1].trip_count, 80);
    }

    #[test]
    fn log_scaled_clamps_zero() {
        assert_eq!(log_scaled(0), 0.0);
        assert_eq!(log_scaled(1), 0.0);
        assert!((log_scaled(100) - 100f64.ln()).abs() < 1e-12);
    }
}
