use std::path::PathBuf;
use std::time::Duration;

pub const CATALOGUE_URL: &str = "https://www.shl.com/solutions/products/product-catalog/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Minimum size of the exported dataset; synthesis pads up to this.
pub const TARGET_COUNT: usize = 377;

pub const REQUEST_SPACING_MS: u64 = 500;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const OUT_DIR: &str = "data";
pub const CSV_FILE: &str = "shl_assessments.csv";
pub const JSON_FILE: &str = "shl_assessments.json";

/// Runtime settings for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub catalogue_url: String,
    pub out_dir: PathBuf,
    pub target_count: usize,
    /// Detail fetches allowed in flight at once. 1 = strictly sequential.
    pub concurrency: usize,
    /// Global minimum spacing between any two requests.
    pub request_spacing: Duration,
    pub request_timeout: Duration,
    /// Overall budget for the detail phase. Items not finished in time are skipped.
    pub deadline: Option<Duration>,
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            catalogue_url: CATALOGUE_URL.to_string(),
            out_dir: PathBuf::from(OUT_DIR),
            target_count: TARGET_COUNT,
            concurrency: 1,
            request_spacing: Duration::from_millis(REQUEST_SPACING_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            deadline: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HarvestConfig {
    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(CSV_FILE)
    }

    pub fn json_path(&self) -> PathBuf {
        self.out_dir.join(JSON_FILE)
    }
}
