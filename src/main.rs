mod catalogue;
mod config;
mod detail;
mod export;
mod http;
mod parser;
mod pipeline;
mod record;
mod synth;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use tracing::error;

use config::HarvestConfig;
use pipeline::RunSummary;
use record::AssessmentRecord;

#[derive(Parser)]
#[command(
    name = "assessment_harvester",
    version,
    about = "Harvest individual assessment products from a vendor catalogue into CSV and JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the catalogue, pad to the target count, write both files
    Run(HarvestArgs),
    /// Skip scraping: write the synthesized dataset only
    Synth(OutputArgs),
    /// Summarize a previously written export (.json or .csv)
    Inspect {
        /// Export file to read (default: <out-dir>/shl_assessments.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long, env = "HARVEST_OUT_DIR", default_value = config::OUT_DIR)]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for shl_assessments.csv / shl_assessments.json
    #[arg(long, env = "HARVEST_OUT_DIR", default_value = config::OUT_DIR)]
    out_dir: PathBuf,
    /// Minimum number of records in the output
    #[arg(long, env = "HARVEST_TARGET", default_value_t = config::TARGET_COUNT)]
    target: usize,
}

#[derive(Args)]
struct HarvestArgs {
    #[command(flatten)]
    output: OutputArgs,
    /// Catalogue page to start from
    #[arg(long, env = "HARVEST_CATALOGUE_URL", default_value = config::CATALOGUE_URL)]
    catalogue_url: String,
    /// Detail pages fetched in parallel (1 = sequential)
    #[arg(short = 'j', long, env = "HARVEST_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,
    /// Minimum gap between any two requests, in milliseconds
    #[arg(long, env = "HARVEST_SPACING_MS", default_value_t = config::REQUEST_SPACING_MS)]
    spacing_ms: u64,
    /// Per-request timeout, in seconds
    #[arg(long, env = "HARVEST_TIMEOUT_SECS", default_value_t = config::REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,
    /// Give up on outstanding detail pages after this many seconds
    #[arg(long, env = "HARVEST_DEADLINE_SECS")]
    deadline_secs: Option<u64>,
}

impl OutputArgs {
    fn into_config(self) -> HarvestConfig {
        HarvestConfig {
            out_dir: self.out_dir,
            target_count: self.target,
            ..HarvestConfig::default()
        }
    }
}

impl HarvestArgs {
    fn into_config(self) -> HarvestConfig {
        HarvestConfig {
            catalogue_url: self.catalogue_url,
            concurrency: self.concurrency.max(1),
            request_spacing: Duration::from_millis(self.spacing_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
            deadline: self.deadline_secs.map(Duration::from_secs),
            ..self.output.into_config()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => {
            let config = args.into_config();
            println!("Scraping catalogue: {}", config.catalogue_url);
            let summary = pipeline::run(&config).await;
            report(&summary)
        }
        Commands::Synth(args) => {
            let config = args.into_config();
            let summary = pipeline::run_offline(&config);
            report(&summary)
        }
        Commands::Inspect { file, out_dir } => {
            let path = file.unwrap_or_else(|| out_dir.join(config::JSON_FILE));
            inspect(&path)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn report(summary: &RunSummary) -> anyhow::Result<()> {
    let mut written = Vec::new();
    for outcome in [&summary.export.csv, &summary.export.json] {
        match outcome {
            Ok(path) => written.push(path.display().to_string()),
            Err(e) => error!("Export failed: {:#}", e),
        }
    }

    if let Some(line) = saved_line(&written) {
        println!("{}", line);
    }
    println!(
        "Total assessments: {} ({} scraped, {} synthesized)",
        summary.total, summary.scraped, summary.synthesized
    );

    if summary.export.all_failed() {
        anyhow::bail!("no output file could be written");
    }
    Ok(())
}

/// `None` when nothing was written; the export errors speak for themselves.
fn saved_line(written: &[String]) -> Option<String> {
    if written.is_empty() {
        None
    } else {
        Some(format!("Data saved to {}", written.join(" and ")))
    }
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let records = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => export::read_csv(path)?,
        _ => export::read_json(path)?,
    };
    if records.is_empty() {
        println!("No records in {}", path.display());
        return Ok(());
    }

    let stats = ExportStats::from_records(&records);
    println!("File:      {}", path.display());
    println!("Records:   {}", stats.total);
    println!("Adaptive:  {}", stats.adaptive);
    println!("Remote:    {}", stats.remote);
    println!("Avg mins:  {:.1}", stats.mean_duration);
    println!("\n--- Test types ---");
    for (label, count) in &stats.labels {
        println!("  {:<12} {:>5}", label, count);
    }
    Ok(())
}

struct ExportStats {
    total: usize,
    adaptive: usize,
    remote: usize,
    mean_duration: f64,
    labels: BTreeMap<&'static str, usize>,
}

impl ExportStats {
    fn from_records(records: &[AssessmentRecord]) -> Self {
        let mut labels = BTreeMap::new();
        for label in records.iter().flat_map(|r| &r.test_type) {
            *labels.entry(label.as_str()).or_insert(0) += 1;
        }
        let minutes: u64 = records.iter().map(|r| u64::from(r.duration)).sum();
        Self {
            total: records.len(),
            adaptive: records.iter().filter(|r| r.adaptive_support).count(),
            remote: records.iter().filter(|r| r.remote_support).count(),
            mean_duration: if records.is_empty() {
                0.0
            } else {
                minutes as f64 / records.len() as f64
            },
            labels,
        }
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
