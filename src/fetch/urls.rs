// src/fetch/urls.rs
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Filename pattern for TLC trip-record files. Matches both the monthly
/// variant (`yellow_tripdata_2023-01.parquet`) and the year-only variant
/// (`fhv_tripdata_2019.parquet`).
static TRIPDATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tripdata_(\d{4})(?:-(\d{2}))?\.parquet$").expect("valid regex"));

/// Partition components extracted from a trip-record filename.
/// They stay zero-padded strings since they become directory names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub year: String,
    pub month: Option<String>,
}

/// Read a newline-delimited URL list, trimming whitespace and skipping
/// blank lines. Order is preserved.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading URL list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Extract the trailing filename from a URL.
pub fn file_name(url_str: &str) -> Result<String> {
    let url = Url::parse(url_str).with_context(|| format!("parsing URL {url_str}"))?;
    let name = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    match name {
        Some(name) => Ok(name),
        None => bail!("{url_str} has no filename component"),
    }
}

/// Classify a filename into its year (and month, where present) partition.
/// Returns `None` for filenames that do not match the trip-record pattern.
pub fn classify(filename: &str) -> Option<Partition> {
    let caps = TRIPDATA_RE.captures(filename)?;
    Some(Partition {
        year: caps[1].to_string(),
        month: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// Deterministic destination for a URL:
/// `<out_root>/<year>[/<month>]/<filename>` when the filename matches the
/// trip-record pattern, `<out_root>/<filename>` otherwise. No partition is
/// ever inferred for a non-matching name.
pub fn dest_path(out_root: &Path, url_str: &str) -> Result<PathBuf> {
    let name = file_name(url_str)?;
    let dir = match classify(&name) {
        Some(partition) => {
            let mut dir = out_root.join(&partition.year);
            if let Some(month) = &partition.month {
                dir = dir.join(month);
            }
            dir
        }
        None => out_root.to_path_buf(),
    };
    Ok(dir.join(name))
}
