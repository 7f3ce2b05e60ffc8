//! Frontier queue and visited-set bookkeeping
//!
//! The frontier and the two visited sets are the only mutable state shared
//! between the pages of one wave. Every membership decision is a single
//! check-and-insert under a mutex, so two concurrent discoveries of the
//! same URL always collapse to exactly one fetch.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use url::Url;

/// The ordered queue of discovered, not-yet-processed page URLs
struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<String>,
}

impl Frontier {
    fn new(seed: Url) -> Self {
        let mut queued = HashSet::new();
        queued.insert(seed.as_str().to_string());
        let mut queue = VecDeque::new();
        queue.push_back(seed);
        Self { queue, queued }
    }
}

/// Shared crawl state: the frontier plus both visited sets
///
/// Locks are held only for the duration of a check-and-insert or a wave
/// claim, never across an await point.
pub struct CrawlState {
    frontier: Mutex<Frontier>,
    visited_pages: Mutex<HashSet<String>>,
    visited_assets: Mutex<HashSet<String>>,
}

impl CrawlState {
    /// Creates crawl state with the frontier holding exactly the seed URL
    pub fn new(seed: Url) -> Self {
        Self {
            frontier: Mutex::new(Frontier::new(seed)),
            visited_pages: Mutex::new(HashSet::new()),
            visited_assets: Mutex::new(HashSet::new()),
        }
    }

    /// Appends a page URL to the frontier
    ///
    /// A no-op if the URL was already visited or is already queued, so a
    /// URL can be enqueued at most once per job.
    pub fn enqueue(&self, url: &Url) {
        let key = url.as_str().to_string();

        let visited = self.visited_pages.lock().unwrap();
        if visited.contains(&key) {
            return;
        }

        let mut frontier = self.frontier.lock().unwrap();
        if frontier.queued.insert(key) {
            frontier.queue.push_back(url.clone());
        }
    }

    /// Removes up to `size` URLs from the head of the frontier, in the
    /// order they were enqueued
    pub fn claim_wave(&self, size: usize) -> Vec<Url> {
        let mut frontier = self.frontier.lock().unwrap();
        let mut wave = Vec::with_capacity(size.min(frontier.queue.len()));
        while wave.len() < size {
            match frontier.queue.pop_front() {
                Some(url) => {
                    frontier.queued.remove(url.as_str());
                    wave.push(url);
                }
                None => break,
            }
        }
        wave
    }

    /// Marks a page URL visited; returns true if this call claimed it
    pub fn claim_page(&self, url: &Url) -> bool {
        self.visited_pages
            .lock()
            .unwrap()
            .insert(url.as_str().to_string())
    }

    /// Marks an asset URL visited; returns true if this call claimed it
    pub fn claim_asset(&self, url: &Url) -> bool {
        self.visited_assets
            .lock()
            .unwrap()
            .insert(url.as_str().to_string())
    }

    /// Returns the number of URLs waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.frontier.lock().unwrap().queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.webflow.io{}", path)).unwrap()
    }

    #[test]
    fn test_seed_is_queued() {
        let state = CrawlState::new(url("/"));
        assert_eq!(state.frontier_len(), 1);
    }

    #[test]
    fn test_enqueue_is_fifo() {
        let state = CrawlState::new(url("/"));
        state.enqueue(&url("/a"));
        state.enqueue(&url("/b"));
        state.enqueue(&url("/c"));

        let wave = state.claim_wave(10);
        let paths: Vec<&str> = wave.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/", "/a", "/b", "/c"]);
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let state = CrawlState::new(url("/"));
        state.enqueue(&url("/a"));
        state.enqueue(&url("/a"));
        state.enqueue(&url("/a"));

        assert_eq!(state.frontier_len(), 2);
    }

    #[test]
    fn test_enqueue_skips_visited() {
        let state = CrawlState::new(url("/"));
        assert!(state.claim_page(&url("/done")));
        state.enqueue(&url("/done"));

        assert_eq!(state.frontier_len(), 1);
    }

    #[test]
    fn test_claim_wave_respects_size() {
        let state = CrawlState::new(url("/"));
        for i in 0..20 {
            state.enqueue(&url(&format!("/page{}", i)));
        }

        let wave = state.claim_wave(15);
        assert_eq!(wave.len(), 15);
        assert_eq!(state.frontier_len(), 6);

        let next = state.claim_wave(15);
        assert_eq!(next.len(), 6);
        assert_eq!(state.frontier_len(), 0);
    }

    #[test]
    fn test_claim_page_only_once() {
        let state = CrawlState::new(url("/"));
        assert!(state.claim_page(&url("/a")));
        assert!(!state.claim_page(&url("/a")));
    }

    #[test]
    fn test_claim_asset_only_once() {
        let state = CrawlState::new(url("/"));
        let asset = url("/css/site.css");
        assert!(state.claim_asset(&asset));
        assert!(!state.claim_asset(&asset));
    }

    #[test]
    fn test_url_can_requeue_after_claim_wave() {
        // Once claimed off the frontier a URL is only kept out again if it
        // was marked visited; the engine marks it at dispatch.
        let state = CrawlState::new(url("/"));
        let wave = state.claim_wave(1);
        assert_eq!(wave.len(), 1);
        assert!(state.claim_page(&wave[0]));

        state.enqueue(&wave[0]);
        assert_eq!(state.frontier_len(), 0);
    }
}
