// src/plot/mod.rs
//
// Chart rendering on top of `plotters`. Every chart is written as a PNG;
// the `draw_*` functions take a drawing area so binaries can stack several
// panels onto one bitmap.
use anyhow::{bail, Result};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::geo::{bounding_box, Zone};

const BORDER: RGBColor = RGBColor(40, 40, 40);
const BACKDROP_FILL: RGBColor = RGBColor(225, 225, 225);

/// One named line on a time-series chart.
pub struct Series {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Multi-series line chart over dates, with point markers and a legend.
pub fn time_series_chart(path: &Path, title: &str, y_label: &str, series: &[Series]) -> Result<()> {
    let root = BitMapBackend::new(path, (1600, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_time_series(&root, title, y_label, series)?;
    root.present()?;
    Ok(())
}

/// Equal-width histogram of a numeric column.
pub fn histogram_chart(
    path: &Path,
    title: &str,
    x_label: &str,
    values: &[f64],
    bins: usize,
) -> Result<()> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_histogram(&root, title, x_label, values, bins)?;
    root.present()?;
    Ok(())
}

pub fn draw_time_series(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    y_label: &str,
    series: &[Series],
) -> Result<()> {
    let mut dates = series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
    let Some(first) = dates.next() else {
        bail!("no data points to plot");
    };
    let (x_min, x_max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    // a single month still needs a non-empty x range
    let x_max = if x_min == x_max {
        x_max + chrono::Duration::days(1)
    } else {
        x_max
    };
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, v)| *v))
        .fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Month Start")
        .y_desc(y_label)
        .x_labels(12)
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.points.iter().cloned(),
                color.stroke_width(2),
            ))?
            .label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            s.points
                .iter()
                .map(|point| Circle::new(*point, 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

pub fn draw_histogram(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    x_label: &str,
    values: &[f64],
    bins: usize,
) -> Result<()> {
    if values.is_empty() || bins == 0 {
        bail!("no data points to plot");
    }
    let buckets = bin_counts(values, bins);
    let x_min = buckets.first().map(|b| b.0).unwrap_or(0.0);
    let x_max = buckets.last().map(|b| b.1).unwrap_or(1.0);
    let y_max = buckets.iter().map(|b| b.2).max().unwrap_or(1).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(buckets.iter().map(|(lo, hi, count)| {
        Rectangle::new(
            [(*lo, 0.0), (*hi, *count as f64)],
            full_palette::PURPLE.mix(0.8).filled(),
        )
    }))?;
    chart.draw_series(
        buckets
            .iter()
            .map(|(lo, hi, count)| Rectangle::new([(*lo, 0.0), (*hi, *count as f64)], BORDER)),
    )?;
    Ok(())
}

/// Choropleth of zone polygons shaded from a continuous color ramp, with
/// unmatched zones as a neutral backdrop for geographic context and a
/// labelled color bar on the right. Axes are hidden.
pub fn choropleth(
    path: &Path,
    title: &str,
    legend_label: &str,
    shaded: &[(&Zone, f64)],
    backdrop: &[&Zone],
) -> Result<()> {
    if shaded.is_empty() {
        bail!("no zones matched the statistics table");
    }
    let all = shaded
        .iter()
        .map(|(zone, _)| *zone)
        .chain(backdrop.iter().copied());
    let Some((x0, y0, x1, y1)) = bounding_box(all) else {
        bail!("zone boundaries carry no coordinates");
    };
    let pad_x = (x1 - x0).max(f64::EPSILON) * 0.02;
    let pad_y = (y1 - y0).max(f64::EPSILON) * 0.02;

    let v_min = shaded.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let mut v_max = shaded
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    if v_max <= v_min {
        v_max = v_min + 1.0;
    }

    let root = BitMapBackend::new(path, (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let (map_area, bar_area) = root.split_horizontally(1040);

    let mut chart = ChartBuilder::on(&map_area)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .build_cartesian_2d(x0 - pad_x..x1 + pad_x, y0 - pad_y..y1 + pad_y)?;

    // backdrop first, so shaded zones draw over it
    chart.draw_series(
        backdrop
            .iter()
            .flat_map(|zone| zone.rings.iter())
            .map(|ring| Polygon::new(ring.clone(), BACKDROP_FILL.filled())),
    )?;
    chart.draw_series(
        backdrop
            .iter()
            .flat_map(|zone| zone.rings.iter())
            .map(|ring| PathElement::new(closed(ring), WHITE.stroke_width(1))),
    )?;

    chart.draw_series(shaded.iter().flat_map(|(zone, value)| {
        let t = (value - v_min) / (v_max - v_min);
        let fill = ramp_color(t).mix(0.75).filled();
        zone.rings
            .iter()
            .map(move |ring| Polygon::new(ring.clone(), fill))
    }))?;
    chart.draw_series(
        shaded
            .iter()
            .flat_map(|(zone, _)| zone.rings.iter())
            .map(|ring| PathElement::new(closed(ring), BORDER.stroke_width(1))),
    )?;

    draw_color_bar(&bar_area, legend_label, v_min, v_max)?;
    root.present()?;
    Ok(())
}

fn draw_color_bar(
    area: &DrawingArea<BitMapBackend, Shift>,
    legend_label: &str,
    v_min: f64,
    v_max: f64,
) -> Result<()> {
    let titled = area.titled(legend_label, ("sans-serif", 18))?;
    let mut bar = ChartBuilder::on(&titled)
        .margin(10)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, v_min..v_max)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .draw()?;

    const STEPS: usize = 64;
    bar.draw_series((0..STEPS).map(|i| {
        let t0 = i as f64 / STEPS as f64;
        let t1 = (i + 1) as f64 / STEPS as f64;
        Rectangle::new(
            [
                (0.0, v_min + t0 * (v_max - v_min)),
                (1.0, v_min + t1 * (v_max - v_min)),
            ],
            ramp_color(t0).filled(),
        )
    }))?;
    Ok(())
}

// Piecewise-linear ramp through plasma-like stops, dark to bright.
fn ramp_color(t: f64) -> RGBColor {
    const STOPS: [(u8, u8, u8); 5] = [
        (13, 8, 135),
        (126, 3, 168),
        (204, 71, 120),
        (248, 149, 64),
        (240, 249, 33),
    ];
    let t = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let idx = (t.floor() as usize).min(STOPS.len() - 2);
    let frac = t - idx as f64;
    let (r0, g0, b0) = STOPS[idx];
    let (r1, g1, b1) = STOPS[idx + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

fn bin_counts(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // degenerate column: a single bar around the constant value
    if max <= min {
        return vec![(min - 0.5, min + 0.5, values.len())];
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + i as f64 * width;
            (lo, lo + width, count)
        })
        .collect()
}

fn closed(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts = ring.to_vec();
    if pts.first() != pts.last() {
        if let Some(first) = pts.first().copied() {
            pts.push(first);
        }
    }
    pts
}
