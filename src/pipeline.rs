use std::sync::Arc;

use tracing::{info, warn};

use crate::catalogue;
use crate::config::HarvestConfig;
use crate::export::{self, ExportReport};
use crate::http::HttpClient;
use crate::record::AssessmentRecord;
use crate::synth;

pub struct RunSummary {
    pub scraped: usize,
    pub synthesized: usize,
    pub total: usize,
    pub export: ExportReport,
}

/// Discovery → augmentation → export. Never aborts: a failed discovery
/// just means zero scraped records.
pub async fn run(config: &HarvestConfig) -> RunSummary {
    let scraped = match HttpClient::new(config) {
        Ok(client) => catalogue::discover(Arc::new(client), config).await,
        Err(e) => {
            warn!("Error building HTTP client: {:#}", e);
            Vec::new()
        }
    };
    finish(scraped, config)
}

/// Augmentation and export only, as if discovery found nothing.
pub fn run_offline(config: &HarvestConfig) -> RunSummary {
    finish(Vec::new(), config)
}

fn finish(mut records: Vec<AssessmentRecord>, config: &HarvestConfig) -> RunSummary {
    let scraped = records.len();
    let extra = synth::augment(&records, config.target_count);
    let synthesized = extra.len();
    records.extend(extra);
    info!(scraped, synthesized, "Assembled {} records", records.len());

    let export = export::export(&records, &config.csv_path(), &config.json_path());
    RunSummary {
        scraped,
        synthesized,
        total: records.len(),
        export,
    }
}
