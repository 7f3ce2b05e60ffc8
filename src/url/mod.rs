//! URL handling for the mirror
//!
//! This module provides:
//! - URL normalization (the identity key for frontier and visited-set
//!   membership)
//! - The deterministic mapping from a URL to its local path within a job's
//!   working area, and the relative hrefs written back into documents

mod normalize;
mod paths;

pub use normalize::{normalize_url, normalized, same_origin};
pub use paths::{local_path, relative_href};
