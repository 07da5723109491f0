// src/geo/mod.rs
//
// Taxi-zone boundaries come in as a GeoJSON FeatureCollection. Only the
// exterior rings are kept; holes do not matter for a shaded heatmap.
use anyhow::{bail, Context, Result};
use geojson::{Feature, GeoJson};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// A taxi zone: its id plus the exterior ring(s) of its boundary in
/// lon/lat order.
#[derive(Debug, Clone)]
pub struct Zone {
    pub location_id: i64,
    pub rings: Vec<Vec<(f64, f64)>>,
}

/// Envelope `(min_x, min_y, max_x, max_y)` over a set of zones.
pub fn bounding_box<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> Option<(f64, f64, f64, f64)> {
    let mut bbox: Option<(f64, f64, f64, f64)> = None;
    for zone in zones {
        for (x, y) in zone.rings.iter().flatten() {
            bbox = Some(match bbox {
                None => (*x, *y, *x, *y),
                Some((x0, y0, x1, y1)) => (x0.min(*x), y0.min(*y), x1.max(*x), y1.max(*y)),
            });
        }
    }
    bbox
}

/// Parse a zone boundary file. Features without a usable `location_id`
/// property or without polygon geometry are skipped with a warning.
pub fn load_zones(path: &Path) -> Result<Vec<Zone>> {
    let file =
        File::open(path).with_context(|| format!("opening boundary file {}", path.display()))?;
    let geojson = GeoJson::from_reader(file)
        .with_context(|| format!("parsing boundary file {}", path.display()))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => bail!("{} is not a FeatureCollection", path.display()),
    };

    let mut zones = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Some(location_id) = location_id(&feature) else {
            warn!("skipping zone feature without a location_id");
            continue;
        };
        let rings = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Polygon(polygon)) => exterior_ring(polygon).into_iter().collect(),
            Some(geojson::Value::MultiPolygon(polygons)) => {
                polygons.iter().filter_map(exterior_ring).collect()
            }
            _ => Vec::new(),
        };
        if rings.is_empty() {
            warn!(location_id, "skipping zone without polygon geometry");
            continue;
        }
        zones.push(Zone { location_id, rings });
    }
    Ok(zones)
}

/// Inner join of zones against per-zone values: matched zones paired with
/// their value, unmatched zones returned separately for backdrop drawing.
pub fn merge<'a>(
    zones: &'a [Zone],
    values: &HashMap<i64, f64>,
) -> (Vec<(&'a Zone, f64)>, Vec<&'a Zone>) {
    let mut shaded = Vec::new();
    let mut backdrop = Vec::new();
    for zone in zones {
        match values.get(&zone.location_id) {
            Some(value) => shaded.push((zone, *value)),
            None => backdrop.push(zone),
        }
    }
    (shaded, backdrop)
}

// The source data carries location_id sometimes as a number, sometimes as a
// numeric string; coerce both.
fn location_id(feature: &Feature) -> Option<i64> {
    let value = feature.properties.as_ref()?.get("location_id")?;
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn exterior_ring(polygon: &geojson::PolygonType) -> Option<Vec<(f64, f64)>> {
    let ring = polygon.first()?;
    Some(
        ring.iter()
            .filter_map(|pos| Some((*pos.first()?, *pos.get(1)?)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "location_id": "4", "zone": "Alphabet City" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-74.0, 40.7], [-73.9, 40.7], [-73.9, 40.8], [-74.0, 40.7]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "location_id": 132 },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-73.8, 40.6], [-73.7, 40.6], [-73.7, 40.7], [-73.8, 40.6]]],
                        [[[-73.82, 40.64], [-73.81, 40.64], [-73.81, 40.65], [-73.82, 40.64]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "zone": "no id here" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }
        ]
    }"#;

    fn write_zones() -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(ZONES.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn loads_zones_with_string_and_numeric_ids() -> Result<()> {
        let tmp = write_zones();
        let zones = load_zones(tmp.path())?;
        assert_eq!(zones.len(), 2, "feature without id is skipped");
        assert_eq!(zones[0].location_id, 4);
        assert_eq!(zones[0].rings.len(), 1);
        assert_eq!(zones[1].location_id, 132);
        assert_eq!(zones[1].rings.len(), 2, "one exterior ring per polygon");
        Ok(())
    }

    #[test]
    fn merge_is_an_inner_join_with_backdrop() -> Result<()> {
        let tmp = write_zones();
        let zones = load_zones(tmp.path())?;
        let values = HashMap::from([(132, 3.5), (999, 1.0)]);
        let (shaded, backdrop) = merge(&zones, &values);
        assert_eq!(shaded.len(), 1);
        assert_eq!(shaded[0].0.location_id, 132);
        assert_eq!(shaded[0].1, 3.5);
        assert_eq!(backdrop.len(), 1);
        assert_eq!(backdrop[0].location_id, 4);
        Ok(())
    }

    #[test]
    fn bounding_box_spans_all_rings() -> Result<()> {
        let tmp = write_zones();
        let zones = load_zones(tmp.path())?;
        let (x0, y0, x1, y1) = bounding_box(&zones).unwrap();
        assert_eq!((x0, y0), (-74.0, 40.6));
        assert_eq!((x1, y1), (-73.7, 40.8));
        Ok(())
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        let zones: Vec<Zone> = Vec::new();
        assert!(bounding_box(&zones).is_none());
    }
}
