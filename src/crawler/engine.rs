//! The crawl engine
//!
//! Drives the whole traversal: claims FIFO waves off the frontier,
//! processes the pages of a wave concurrently, folds their byte
//! contributions into the job's running total, and stops when the
//! frontier drains or the size ceiling is crossed. A page failure is
//! logged and contributes nothing; only the size ceiling (or a setup
//! failure upstream) ends the job early.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::frontier::CrawlState;
use crate::crawler::page::process_page;
use crate::job::Job;
use crate::url::normalized;
use crate::{MirrorError, Result};
use futures::future::join_all;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Everything a page needs while it is being processed
///
/// Pages within one wave share this by reference; the frontier and
/// visited sets inside `state` carry their own locking.
pub(crate) struct CrawlContext<'a> {
    pub client: &'a Client,
    pub config: &'a CrawlerConfig,
    pub origin: &'a Url,
    pub root: &'a Path,
    pub state: &'a CrawlState,
}

/// Crawls the job's site into its working area
///
/// The frontier starts with exactly the job's target URL. Waves are
/// claimed in enqueue order; within a wave the pages run concurrently
/// and finish in no particular order.
///
/// # Returns
///
/// * `Ok(())` - Frontier drained with the byte total under the ceiling
/// * `Err(MirrorError::SizeLimitExceeded)` - The ceiling was crossed
pub async fn crawl_site(job: &mut Job, config: &Config, client: &Client) -> Result<()> {
    let state = CrawlState::new(normalized(&job.target));
    let ctx = CrawlContext {
        client,
        config: &config.crawler,
        origin: &job.origin,
        root: &job.workdir,
        state: &state,
    };

    let mut waves = 0usize;
    let mut pages = 0usize;

    loop {
        let wave = state.claim_wave(config.crawler.wave_size);
        if wave.is_empty() {
            break;
        }
        waves += 1;

        let dispatched: Vec<&Url> = wave.iter().filter(|url| state.claim_page(url)).collect();
        pages += dispatched.len();

        let results = join_all(dispatched.into_iter().map(|url| {
            let ctx = &ctx;
            async move {
                match process_page(ctx, url).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!("Dropping page {} from the mirror: {}", url, e);
                        0
                    }
                }
            }
        }))
        .await;

        let wave_bytes: u64 = results.iter().sum();
        job.bytes_total += wave_bytes;

        tracing::info!(
            "Wave {}: {} pages, {} bytes this wave, {} bytes total, {} queued",
            waves,
            results.len(),
            wave_bytes,
            job.bytes_total,
            state.frontier_len()
        );

        if job.bytes_total > config.crawler.max_total_bytes {
            return Err(MirrorError::SizeLimitExceeded {
                limit: config.crawler.max_total_bytes,
                total: job.bytes_total,
            });
        }
    }

    tracing::info!(
        "Crawl complete: {} pages over {} waves, {} bytes",
        pages,
        waves,
        job.bytes_total
    );

    Ok(())
}
