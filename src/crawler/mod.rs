//! The crawl-and-localize engine
//!
//! This module contains the core traversal logic:
//! - Frontier queue and visited-set bookkeeping
//! - Wave-based page dispatch with bounded concurrency
//! - Asset localization and hyperlink rewriting
//! - Cumulative size-ceiling enforcement

mod assets;
mod engine;
mod frontier;
mod links;
mod page;

pub use engine::crawl_site;
pub use frontier::CrawlState;

pub(crate) use engine::CrawlContext;
