//! Rule source watcher for hot reload.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::lifecycle::signals::{ReloadRequest, ReloadTrigger};

/// Monitors rule sources and requests a reload when one changes.
///
/// Parent directories are watched so sources that do not exist yet are
/// picked up when created.
pub struct RuleWatcher {
    sources: Vec<PathBuf>,
    poll_interval: Duration,
    trigger: ReloadTrigger,
}

impl RuleWatcher {
    pub fn new(sources: &[PathBuf], poll_interval: Duration, trigger: ReloadTrigger) -> Self {
        Self {
            sources: sources.iter().map(|p| absolutize(p)).collect(),
            poll_interval,
            trigger,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let watched: HashSet<PathBuf> = self.sources.iter().cloned().collect();
        let trigger = self.trigger.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_relevant(&event.kind) {
                        return;
                    }
                    if let Some(path) = event.paths.iter().find(|p| watched.contains(*p)) {
                        tracing::info!(path = ?path, "Rule source change detected");
                        trigger.request(ReloadRequest::SourceChanged(path.clone()));
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        for dir in watch_dirs(&self.sources) {
            if !dir.is_dir() {
                tracing::debug!(dir = ?dir, "Rule directory absent, not watching");
                continue;
            }
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            tracing::info!(dir = ?dir, "Rule watcher started");
        }

        Ok(watcher)
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    kind.is_create() || kind.is_modify() || kind.is_remove()
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Distinct parent directories of `sources`, in first-seen order.
fn watch_dirs(sources: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .filter_map(|p| p.parent())
        .filter(|dir| seen.insert(dir.to_path_buf()))
        .map(Path::to_path_buf)
        .collect()
}
