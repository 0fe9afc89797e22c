use chrono::Local;
use review_scrap::{info_time, process::process_site, Result, ScrapeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let start_time = Local::now();
    let summary = process_site(&ScrapeConfig::default()).await?;
    info_time!(
        start_time,
        "Scraped {} reviews from {} pages ({} empty) into {}",
        summary.records,
        summary.pages,
        summary.empty_pages.len(),
        summary.output_path.display()
    );

    Ok(())
}
