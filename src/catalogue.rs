use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::HarvestConfig;
use crate::detail;
use crate::http::HttpClient;
use crate::parser::{links, Page};
use crate::record::AssessmentRecord;

/// Fetch the catalogue page and scrape every in-scope detail link.
///
/// A failed catalogue fetch is logged and yields no records; the run goes on.
pub async fn discover(client: Arc<HttpClient>, config: &HarvestConfig) -> Vec<AssessmentRecord> {
    match try_discover(client, config).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Error scraping catalogue: {:#}", e);
            Vec::new()
        }
    }
}

async fn try_discover(client: Arc<HttpClient>, config: &HarvestConfig) -> Result<Vec<AssessmentRecord>> {
    let base = Url::parse(&config.catalogue_url)
        .with_context(|| format!("invalid catalogue URL {:?}", config.catalogue_url))?;

    info!("Fetching catalogue: {}", base);
    let body = client.fetch(base.as_str()).await?;

    // Parsed tree is not Send; keep it out of any await.
    let found = {
        let page = Page::parse(&body);
        links::catalogue_links(&page, &base)
    };
    info!("In-scope links: {}", found.len());
    for link in &found {
        debug!("{} -> {}", link.text, link.url);
    }

    let (records, stats) = detail::scrape_details(client, found, config).await;
    info!(
        "Detail pages: {} total ({} ok, {} errors, {} skipped)",
        stats.total, stats.ok, stats.errors, stats.skipped
    );
    Ok(records)
}
