//! Working-area maintenance
//!
//! A process crash mid-job leaks its working area; the janitor removes
//! leftovers older than the configured age threshold. It runs on its own
//! schedule and never coordinates with live jobs beyond path
//! independence: every job owns a uuid-named directory, and the age
//! threshold must exceed any plausible job duration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Removes stale job directories under the working-area root
///
/// A directory is stale when its modification time is older than
/// `max_age`. Entries that cannot be inspected or removed are logged and
/// skipped. A missing root is fine; there is nothing to sweep.
///
/// # Returns
///
/// The number of directories removed.
pub fn sweep_stale(root: &Path, max_age: Duration) -> usize {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
        Err(e) => {
            tracing::warn!("Janitor cannot read {}: {}", root.display(), e);
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok());

        match age {
            Some(age) if age > max_age => match std::fs::remove_dir_all(&path) {
                Ok(()) => {
                    tracing::info!(
                        "Janitor removed stale working area {} (age {:?})",
                        path.display(),
                        age
                    );
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!("Janitor failed to remove {}: {}", path.display(), e);
                }
            },
            _ => {}
        }
    }

    removed
}

/// Sweeps the working-area root on a fixed interval
///
/// The first sweep happens immediately, so leftover state from an earlier
/// crash is cleared before new jobs run. Intended to be spawned as an
/// independent task; it never returns.
pub async fn run_periodic(root: PathBuf, max_age: Duration, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        sweep_stale(&root, max_age);
    }
}
