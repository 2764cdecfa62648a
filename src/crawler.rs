// src/crawler.rs

//! Paginated review crawl loop.
//!
//! A small state machine over a [`RenderSession`]: wait for the review
//! container, extract card texts, advance to the next page, bounded by the
//! page cap. Every stop condition is a [`DrainReason`], never an error, and
//! blocks accumulated before the stop are kept.

use std::time::Duration;

use chrono::Utc;
use log::{info, warn};

use crate::config::CrawlerConfig;
use crate::models::{CrawlOutcome, DrainReason};
use crate::session::RenderSession;

/// Drive `session` through up to `config.max_pages` of review listings.
pub fn run_crawl(session: &mut dyn RenderSession, config: &CrawlerConfig) -> CrawlOutcome {
    let started_at = Utc::now();
    let timeout = Duration::from_secs(config.wait_timeout_secs);
    let settle = Duration::from_millis(config.settle_delay_ms);

    let mut blocks = Vec::new();
    let mut pages_visited = 0;
    let mut drained = DrainReason::PageCapReached;

    for page in 0..config.max_pages {
        // AwaitReviewsContainer
        match session.wait_for(&config.container_selector, timeout) {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    "page {}: review container did not appear within {}s",
                    page + 1,
                    config.wait_timeout_secs
                );
                drained = DrainReason::WaitTimeout;
                break;
            }
            Err(e) => {
                warn!("page {}: session failed while waiting: {e}", page + 1);
                drained = DrainReason::WaitTimeout;
                break;
            }
        }

        // ExtractCards
        let texts = match session.collect_texts(&config.card_selector) {
            Ok(texts) => texts,
            Err(e) => {
                warn!("page {}: failed to read review cards: {e}", page + 1);
                drained = DrainReason::EmptyPage;
                break;
            }
        };
        if texts.is_empty() {
            warn!("no reviews found on page {}", page + 1);
            drained = DrainReason::EmptyPage;
            break;
        }

        pages_visited += 1;
        blocks.extend(
            texts
                .into_iter()
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        );

        if page + 1 == config.max_pages {
            break;
        }

        // AdvancePage
        match session.click(&config.next_selector) {
            Ok(true) => std::thread::sleep(settle),
            Ok(false) | Err(_) => {
                info!("no more review pages after page {}", page + 1);
                drained = DrainReason::NoMorePages;
                break;
            }
        }
    }

    let finished_at = Utc::now();
    info!(
        "crawl drained ({drained}): {} blocks over {} pages in {}s",
        blocks.len(),
        pages_visited,
        (finished_at - started_at).num_seconds()
    );

    CrawlOutcome {
        blocks,
        pages_visited,
        drained,
        started_at,
        finished_at,
    }
}
