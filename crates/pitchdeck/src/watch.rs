use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Watches a deck file and reports when it has changed on disk.
///
/// The containing directory is watched rather than the file, so saves that
/// write a temp file and rename it over the deck keep being seen.
pub struct DeckWatcher {
    path: PathBuf,
    file_name: OsString,
    // Kept alive for the watch to stay registered
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<DebounceEventResult>,
}

impl DeckWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .with_context(|| format!("Not a file path: {}", path.display()))?
            .to_os_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let (tx, events) = mpsc::channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx).context("Failed to start file watcher")?;
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        log::info!("watching {} for changes", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            _debouncer: debouncer,
            events,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events. True if the deck file changed since the last
    /// call; changes to sibling files are ignored.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.events.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events
                        .iter()
                        .any(|event| event.path.file_name() == Some(self.file_name.as_os_str()));
                }
                Err(e) => log::warn!("file watcher error: {e}"),
            }
        }
        changed
    }
}
