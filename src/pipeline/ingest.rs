// src/pipeline/ingest.rs

//! Review ingestion pipeline.
//!
//! URL -> crawl -> parse -> one persisted batch per hotel. A prior batch
//! artifact short-circuits the whole crawl.

use std::path::PathBuf;

use log::{info, warn};

use crate::config::Config;
use crate::crawler::run_crawl;
use crate::error::{AppError, Result};
use crate::models::CrawlOutcome;
use crate::parser::parse_review;
use crate::session::ChromeSession;
use crate::storage::BatchStore;

/// Outcome of one ingestion run.
#[derive(Debug)]
pub struct IngestReport {
    pub artifact_path: PathBuf,
    pub hotel_id: String,
    pub record_count: usize,
    /// True when a prior artifact short-circuited the crawl
    pub skipped: bool,
}

/// Derive the hotel identifier from a listing URL.
///
/// The identifier is the path remainder after the fixed `marker` segment,
/// with a trailing `.html` removed; the query string never participates.
pub fn hotel_id_from_url(url: &str, marker: &str) -> Result<String> {
    let parsed = url::Url::parse(url).map_err(|e| AppError::invalid_url(url, e))?;

    let Some((_, rest)) = parsed.path().split_once(marker) else {
        return Err(AppError::invalid_url(
            url,
            format!("missing '{marker}' segment"),
        ));
    };

    let hotel_id = rest.strip_suffix(".html").unwrap_or(rest);
    if hotel_id.is_empty() {
        return Err(AppError::invalid_url(url, "empty hotel identifier"));
    }
    Ok(hotel_id.to_string())
}

/// Ingest reviews for `url`, crawling with a headless browser session.
pub async fn ingest(url: &str, config: &Config) -> Result<IngestReport> {
    let crawl_url = url.to_string();
    let crawler_config = config.crawler.clone();

    ingest_with(url, config, move || {
        let mut session = ChromeSession::open(&crawl_url, &crawler_config)?;
        Ok(run_crawl(&mut session, &crawler_config))
    })
    .await
}

/// Ingest with a caller-supplied crawl step.
///
/// The crawl runs on the blocking thread pool and is only invoked when no
/// batch artifact exists yet for the hotel.
pub async fn ingest_with<F>(url: &str, config: &Config, crawl: F) -> Result<IngestReport>
where
    F: FnOnce() -> Result<CrawlOutcome> + Send + 'static,
{
    let hotel_id = hotel_id_from_url(url, &config.crawler.hotel_path_marker)?;
    let store = BatchStore::new(&config.storage.data_dir);

    if store.exists(&hotel_id).await {
        let artifact_path = store.artifact_path(&hotel_id);
        info!(
            "batch for {hotel_id} already exists at {}, skipping crawl",
            artifact_path.display()
        );
        let record_count = store
            .read_batch(&hotel_id)
            .await?
            .map_or(0, |records| records.len());
        return Ok(IngestReport {
            artifact_path,
            hotel_id,
            record_count,
            skipped: true,
        });
    }

    info!("collecting reviews for hotel {hotel_id}");
    let outcome = tokio::task::spawn_blocking(crawl)
        .await
        .map_err(|e| AppError::session(format!("crawl task failed: {e}")))??;

    info!(
        "crawl drained ({}) after {} pages with {} raw blocks",
        outcome.drained,
        outcome.pages_visited,
        outcome.blocks.len()
    );

    let mut records = Vec::with_capacity(outcome.blocks.len());
    for (index, block) in outcome.blocks.iter().enumerate() {
        match parse_review(block) {
            Ok(record) => records.push(record),
            // One malformed card must not abort the batch.
            Err(e) => warn!("dropping review block {index}: {e}"),
        }
    }

    if records.is_empty() {
        // An empty batch still short-circuits future runs; delete the
        // artifact to force a re-scrape.
        warn!("no records collected for {hotel_id}; writing empty batch");
    }

    let artifact_path = store.write_batch(&hotel_id, &records).await?;
    info!(
        "wrote {} records to {}",
        records.len(),
        artifact_path.display()
    );

    Ok(IngestReport {
        artifact_path,
        hotel_id,
        record_count: records.len(),
        skipped: false,
    })
}
