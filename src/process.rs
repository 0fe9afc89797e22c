use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use reqwest::Client;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, warn};

use crate::export::write_csv_file;
use crate::parse::parse_page;
use crate::request::request_page_html;
use crate::{info_time, Error, PageFailure, Result, ReviewRecord, ScrapeConfig};

/// What one page's unit of work produced.
#[derive(Debug)]
pub struct PageResult {
    pub page: usize,
    pub result: Result<Vec<ReviewRecord>>,
}

/// Per-page results of a run, always in page order.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub pages: Vec<PageResult>,
}

impl ScrapeOutcome {
    /// Records of every successful page, page 1 first.
    pub fn records(&self) -> Vec<ReviewRecord> {
        self.pages
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .flatten()
            .cloned()
            .collect()
    }

    pub fn failures(&self) -> Vec<PageFailure> {
        self.pages
            .iter()
            .filter_map(|p| match &p.result {
                Err(e) => Some(PageFailure {
                    page: p.page,
                    reason: e.to_string(),
                }),
                Ok(_) => None,
            })
            .collect()
    }

    /// Pages that were fetched fine but had no reviews on them.
    pub fn empty_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| matches!(&p.result, Ok(records) if records.is_empty()))
            .map(|p| p.page)
            .collect()
    }
}

/// Summary of a run where every page succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub records: usize,
    pub empty_pages: Vec<usize>,
    pub output_path: PathBuf,
}

/// Scrapes every configured page, writes what succeeded to the output file
/// and reports any pages that failed.
pub async fn process_site(config: &ScrapeConfig) -> Result<RunSummary> {
    let start_time = Local::now();
    let client = Client::new();

    info_time!(
        "Started scraping {} pages with {} workers",
        config.page_count,
        config.worker_limit()
    );
    let outcome = scrape_pages(&client, config).await;
    info_time!(start_time, "Finished PROCESSING ALL pages.");

    let records = outcome.records();
    let local_now = Local::now();
    let written = write_csv_file(&config.output_path, &records)?;
    info_time!(
        local_now,
        "Wrote {} reviews to file: {}",
        written,
        config.output_path.display()
    );

    let failures = outcome.failures();
    if !failures.is_empty() {
        return Err(Error::PagesFailed(failures));
    }

    Ok(RunSummary {
        pages: outcome.pages.len(),
        records: written,
        empty_pages: outcome.empty_pages(),
        output_path: config.output_path.clone(),
    })
}

/// Fetches and parses pages `1..=page_count` concurrently, at most
/// `workers` at a time. The outcome is in page order whatever order the
/// pages complete in.
pub async fn scrape_pages(client: &Client, config: &ScrapeConfig) -> ScrapeOutcome {
    let shared = Arc::new(config.clone());
    let client = client.clone();

    run_pages(config.page_count, config.worker_limit(), move |page| {
        // Client uses Arc so we can clone cheaply
        let client = client.clone();
        let config = shared.clone();
        async move { scrape_page(&client, &config, page).await }
    })
    .await
}

/// Runs `unit` once per page with a bounded number in flight and slots each
/// result by page index. A unit that panics becomes `Error::Task` for its
/// own page; siblings keep running.
async fn run_pages<F, Fut>(page_count: usize, workers: usize, unit: F) -> ScrapeOutcome
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<Vec<ReviewRecord>>> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(workers.max(1)));

    let mut task_set = JoinSet::new();
    for page in 1..=page_count {
        let work = unit(page);
        let permits = permits.clone();
        task_set.spawn(async move {
            // The semaphore is never closed.
            let _permit = permits.acquire_owned().await;
            let result = tokio::spawn(work).await.unwrap_or_else(|e| {
                Err(Error::Task {
                    page,
                    reason: e.to_string(),
                })
            });
            (page, result)
        });
    }

    let mut slots: Vec<Option<Result<Vec<ReviewRecord>>>> =
        std::iter::repeat_with(|| None).take(page_count).collect();
    while let Some(task) = task_set.join_next().await {
        let (page, result) = match task {
            Ok(done) => done,
            Err(e) => {
                warn!(error = %e, "page runner did not complete");
                continue;
            }
        };
        match &result {
            Ok(records) => debug!(page, reviews = records.len(), "page done"),
            Err(e) => warn!(page, error = %e, "page failed"),
        }
        slots[page - 1] = Some(result);
    }

    let pages = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| PageResult {
            page: i + 1,
            result: slot.unwrap_or_else(|| {
                Err(Error::Task {
                    page: i + 1,
                    reason: "page produced no result".into(),
                })
            }),
        })
        .collect();
    ScrapeOutcome { pages }
}

/// One unit of work: fetch -> parse -> extract.
async fn scrape_page(
    client: &Client,
    config: &ScrapeConfig,
    page: usize,
) -> Result<Vec<ReviewRecord>> {
    let html = request_page_html(client, config, page).await?;
    parse_page(page, html).await
}
