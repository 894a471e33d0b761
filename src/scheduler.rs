//! Debounced palette regeneration: a single-slot delayed task.
//!
//! Each upload schedules a regeneration run; scheduling again before the
//! delay elapses replaces the pending run, so a burst of uploads collapses
//! into one regeneration that fires a quiet period after the last trigger.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::palette;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle for scheduling palette regeneration. Clone freely; all clones
/// share the same single pending slot.
#[derive(Clone)]
pub struct RegenScheduler {
    runtime: tokio::runtime::Handle,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
    delay: Duration,
    db_path: PathBuf,
    assets_dir: PathBuf,
    tolerance: f64,
}

impl RegenScheduler {
    pub fn new(
        runtime: tokio::runtime::Handle,
        db_path: PathBuf,
        assets_dir: PathBuf,
        delay: Duration,
        tolerance: f64,
    ) -> Self {
        RegenScheduler {
            runtime,
            pending: Arc::new(Mutex::new(None)),
            delay,
            db_path,
            assets_dir,
            tolerance,
        }
    }

    /// Schedule a regeneration `delay` from now, replacing any pending one.
    /// Failures inside the task are logged and left for the next trigger;
    /// regeneration is idempotent and self-corrects on the next run.
    pub fn schedule(&self) {
        let mut slot = self.pending.lock().expect("scheduler slot poisoned");
        if let Some(handle) = slot.take() {
            handle.abort();
            log::debug!("replaced pending palette regeneration");
        }

        let delay = self.delay;
        let db_path = self.db_path.clone();
        let assets_dir = self.assets_dir.clone();
        let tolerance = self.tolerance;
        *slot = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The catalog connection is not Send; open a fresh one on a
            // blocking thread, reading a snapshot at execution time.
            let joined = tokio::task::spawn_blocking(move || {
                Self::run_once(&db_path, &assets_dir, tolerance)
            })
            .await;
            match joined {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => log::warn!("palette regeneration failed: {e}"),
                Err(e) => log::warn!("palette regeneration task failed: {e}"),
            }
        }));
    }

    /// Immediate, synchronous regeneration with its own connection
    pub fn run_once(db_path: &Path, assets_dir: &Path, tolerance: f64) -> Result<Option<PathBuf>> {
        let catalog = Catalog::open(db_path)?;
        palette::generate(&catalog, assets_dir, tolerance)
    }

    /// Cancel the pending regeneration, if any
    pub fn cancel(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .expect("scheduler slot poisoned")
            .take()
        {
            handle.abort();
        }
    }

    /// Whether a regeneration is still scheduled or running
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("scheduler slot poisoned")
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}
