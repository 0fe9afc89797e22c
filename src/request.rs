use reqwest::Client;
use tracing::debug;

use crate::{Error, Result, ScrapeConfig};

/// Requests a listing page and returns a `Result<String>` containing the HTML.
/// Transport errors and non-success statuses both come back as `Error::Fetch`.
pub(crate) async fn request_page_html(
    client: &Client,
    config: &ScrapeConfig,
    page: usize,
) -> Result<String> {
    let url = config.page_url(page)?;
    debug!(page, %url, "requesting page");

    let fetch_err = |source| Error::Fetch { page, source };
    let res = client
        .get(url)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(fetch_err)?;
    let html = res.text().await.map_err(fetch_err)?;
    Ok(html)
}
