// src/fetch/mod.rs
pub mod files;
pub mod urls;

use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Outcome counts for one pass over a URL list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: usize,
}

/// Walk the URL list strictly in order, downloading each file under
/// `out_root` and sleeping `delay` after every attempt to stay under the
/// server's rate limit.
///
/// A failure (network error or non-2xx status) is logged with the URL and
/// counted; it never aborts the rest of the batch. No retries.
pub async fn download_all(
    client: &Client,
    urls: &[String],
    out_root: &Path,
    delay: Duration,
) -> DownloadSummary {
    let mut summary = DownloadSummary::default();

    for url in urls {
        info!(url = %url, "downloading");
        match files::download_file(client, url, out_root).await {
            Ok(path) => {
                info!(url = %url, path = %path.display(), "downloaded");
                summary.downloaded += 1;
            }
            Err(err) => {
                error!("{} failed: {:#}", url, err);
                summary.failed += 1;
            }
        }
        sleep(delay).await;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // URLs that fail before any socket is opened (bad scheme, no filename)
    // must be logged and skipped without aborting the batch.
    #[tokio::test]
    async fn bad_urls_are_isolated_from_the_batch() {
        let dir = tempdir().unwrap();
        let client = Client::new();
        let urls = vec![
            "not a url at all".to_string(),
            "ftp://example.com/yellow_tripdata_2023-01.parquet".to_string(),
            "https://example.com/".to_string(),
        ];

        let summary = download_all(&client, &urls, dir.path(), Duration::ZERO).await;

        assert_eq!(summary.failed, 3);
        assert_eq!(summary.downloaded, 0);
        assert_eq!(
            std::fs::read_dir(dir.path()).unwrap().count(),
            0,
            "failed URLs must not leave files behind"
        );
    }
}
