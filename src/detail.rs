use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

use crate::config::HarvestConfig;
use crate::http::HttpClient;
use crate::parser::{self, links::CatalogueLink};
use crate::record::AssessmentRecord;

/// Detail phase stats returned after completion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrapeStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
    /// Links still outstanding when the deadline hit.
    pub skipped: usize,
}

/// Fetch one detail page and extract a record. Failures are logged and
/// yield `None`; the caller skips the item.
pub async fn fetch_detail(client: &HttpClient, url: &str, name: &str) -> Option<AssessmentRecord> {
    match client.fetch(url).await {
        Ok(body) => Some(parser::extract_record(&body, name, url)),
        Err(e) => {
            warn!("Error scraping {}: {}", url, e);
            None
        }
    }
}

/// Scrape every link with at most `config.concurrency` fetches in flight.
///
/// Workers send results over a channel; this loop is the only writer to the
/// record list. Records come back in link order regardless of completion order.
pub async fn scrape_details(
    client: Arc<HttpClient>,
    links: Vec<CatalogueLink>,
    config: &HarvestConfig,
) -> (Vec<AssessmentRecord>, ScrapeStats) {
    let total = links.len();
    let concurrency = config.concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let pb = progress_bar(total);

    let (tx, mut rx) = mpsc::channel::<(usize, Option<AssessmentRecord>)>(concurrency * 2);

    let mut tasks = JoinSet::new();
    for (index, link) in links.into_iter().enumerate() {
        let client = Arc::clone(&client);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tasks.spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                return;
            };
            let record = fetch_detail(&client, &link.url, &link.text).await;
            let _ = tx.send((index, record)).await;
        });
    }

    // Drop our copy of tx so rx closes when all tasks finish
    drop(tx);

    let deadline = config.deadline.map(|d| Instant::now() + d);
    let mut collected = Vec::new();
    let mut stats = ScrapeStats { total, ..ScrapeStats::default() };

    loop {
        let next = match deadline {
            Some(at) => match timeout_at(at, rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    stats.skipped = total - stats.ok - stats.errors;
                    warn!("Deadline reached, skipping {} outstanding links", stats.skipped);
                    break;
                }
            },
            None => rx.recv().await,
        };
        let Some((index, record)) = next else {
            break;
        };

        match record {
            Some(r) => {
                stats.ok += 1;
                info!(scraped = stats.ok, "Scraped: {}", r.name);
                collected.push((index, r));
            }
            None => stats.errors += 1,
        }
        pb.inc(1);
    }

    tasks.abort_all();
    pb.finish_and_clear();

    collected.sort_by_key(|(index, _)| *index);
    let records = collected.into_iter().map(|(_, r)| r).collect();
    (records, stats)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::test_config;
    use crate::parser::fixture;

    fn link(server: &MockServer, p: &str, text: &str) -> CatalogueLink {
        CatalogueLink {
            url: format!("{}{}", server.uri(), p),
            text: text.to_string(),
        }
    }

    async fn serve(server: &MockServer, p: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn failed_detail_is_none() {
        let server = MockServer::start().await;
        serve(&server, "/gone", ResponseTemplate::new(404)).await;
        let client = HttpClient::new(&test_config(server.uri())).unwrap();
        let url = format!("{}/gone", server.uri());
        assert!(fetch_detail(&client, &url, "Gone").await.is_none());
    }

    #[tokio::test]
    async fn failures_are_skipped_and_order_kept() {
        let server = MockServer::start().await;
        serve(&server, "/a", ResponseTemplate::new(200).set_body_string(fixture("detail_numerical"))).await;
        serve(&server, "/b", ResponseTemplate::new(500)).await;
        serve(&server, "/c", ResponseTemplate::new(200).set_body_string(fixture("detail_opq"))).await;

        let config = HarvestConfig { concurrency: 3, ..test_config(server.uri()) };
        let client = Arc::new(HttpClient::new(&config).unwrap());
        let links = vec![
            link(&server, "/a", "Numerical Reasoning"),
            link(&server, "/b", "Broken"),
            link(&server, "/c", "OPQ32"),
        ];

        let (records, stats) = scrape_details(client, links, &config).await;
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Numerical Reasoning", "OPQ32"]);
        assert_eq!(stats, ScrapeStats { total: 3, ok: 2, errors: 1, skipped: 0 });
        assert_eq!(records[1].duration, 120);
    }

    #[tokio::test]
    async fn order_is_link_order_even_when_first_is_slowest() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/slow",
            ResponseTemplate::new(200)
                .set_body_string("<p>slow</p>")
                .set_delay(Duration::from_millis(200)),
        )
        .await;
        serve(&server, "/fast", ResponseTemplate::new(200).set_body_string("<p>fast</p>")).await;

        let config = HarvestConfig { concurrency: 2, ..test_config(server.uri()) };
        let client = Arc::new(HttpClient::new(&config).unwrap());
        let links = vec![link(&server, "/slow", "Slow test"), link(&server, "/fast", "Fast test")];

        let (records, _) = scrape_details(client, links, &config).await;
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Slow test", "Fast test"]);
    }

    #[tokio::test]
    async fn deadline_keeps_what_finished() {
        let server = MockServer::start().await;
        serve(&server, "/quick", ResponseTemplate::new(200).set_body_string("<p>q</p>")).await;
        serve(
            &server,
            "/stuck",
            ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
        )
        .await;

        let config = HarvestConfig {
            concurrency: 2,
            deadline: Some(Duration::from_millis(400)),
            request_timeout: Duration::from_secs(10),
            ..test_config(server.uri())
        };
        let client = Arc::new(HttpClient::new(&config).unwrap());
        let links = vec![link(&server, "/quick", "Quick test"), link(&server, "/stuck", "Stuck test")];

        let (records, stats) = scrape_details(client, links, &config).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Quick test");
        assert_eq!(stats.skipped, 1);
    }

    #[tokio::test]
    async fn parallel_workers_share_one_request_spacing() {
        let server = MockServer::start().await;
        let arrivals = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&arrivals);
        Mock::given(method("GET"))
            .respond_with(move |_: &wiremock::Request| {
                seen.lock().unwrap().push(std::time::Instant::now());
                ResponseTemplate::new(200).set_body_string("<p>ok</p>")
            })
            .mount(&server)
            .await;

        let spacing = Duration::from_millis(100);
        let config = HarvestConfig {
            concurrency: 5,
            request_spacing: spacing,
            ..test_config(server.uri())
        };
        let client = Arc::new(HttpClient::new(&config).unwrap());
        let links: Vec<_> = (0..6)
            .map(|i| link(&server, &format!("/item/{i}"), &format!("Test {i}")))
            .collect();

        let start = std::time::Instant::now();
        let (records, stats) = scrape_details(client, links, &config).await;
        let elapsed = start.elapsed();

        assert_eq!(records.len(), 6);
        assert_eq!(stats.ok, 6);
        assert!(elapsed >= spacing * 5 - Duration::from_millis(20), "{elapsed:?}");

        let mut arrivals = arrivals.lock().unwrap().clone();
        arrivals.sort();
        assert_eq!(arrivals.len(), 6);
        for pair in arrivals.windows(2) {
            // Small allowance for delivery jitter between client and server.
            assert!(pair[1] - pair[0] >= Duration::from_millis(90), "{:?}", pair[1] - pair[0]);
        }
    }

    #[tokio::test]
    async fn no_links_no_records() {
        let config = test_config("http://127.0.0.1:9".into());
        let client = Arc::new(HttpClient::new(&config).unwrap());
        let (records, stats) = scrape_details(client, Vec::new(), &config).await;
        assert!(records.is_empty());
        assert_eq!(stats.total, 0);
    }
}
