use anyhow::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripscraper::fetch;

const URL_LIST: &str = "download_urls.txt";
const OUTPUT_ROOT: &str = "raw_data";
// fixed pause between requests to stay under the server's rate limit
const REQUEST_DELAY: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let out_root = Path::new(OUTPUT_ROOT);
    std::fs::create_dir_all(out_root)?;

    let urls = fetch::urls::read_url_list(Path::new(URL_LIST))?;
    info!("{} URLs to download", urls.len());

    let client = Client::builder()
        .user_agent(concat!("tripscraper/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let summary = fetch::download_all(&client, &urls, out_root, REQUEST_DELAY).await;

    info!(
        downloaded = summary.downloaded,
        failed = summary.failed,
        "all done"
    );
    Ok(())
}
