//! Content file watching for live reload.
//!
//! The parent directory is watched rather than the file itself, since most
//! editors save by writing a temp file and renaming it over the original.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace, warn};

use crate::nav::Debouncer;

/// Quiet period after the last relevant event before a reload fires.
pub const RELOAD_DEBOUNCE_MS: u64 = 200;

/// Watches the portfolio content file and reports settled changes.
pub struct ContentWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    debouncer: Debouncer<()>,
}

impl std::fmt::Debug for ContentWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentWatcher")
            .field("target_path", &self.target_path)
            .field("watch_root", &self.watch_root)
            .finish_non_exhaustive()
    }
}

impl ContentWatcher {
    /// Start watching `path`.
    ///
    /// # Errors
    /// Returns an error if the OS watcher cannot be created or the
    /// directory cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce_ms: u64) -> notify::Result<Self> {
        // Event paths from the OS are canonical.
        let target_path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let target_name = target_path.file_name().map(std::ffi::OsStr::to_os_string);
        let watch_root = watch_root_for(&target_path);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        debug!(target = %target_path.display(), root = %watch_root.display(), "watching content");

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            debouncer: Debouncer::new(debounce_ms),
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Drain OS events and return true once a change has settled.
    pub fn take_change_ready(&mut self, now_ms: u64) -> bool {
        let mut relevant = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant += 1,
                Ok(ev) => trace!(kind = ?ev.kind, paths = ?ev.paths, "ignored fs event"),
                Err(err) => warn!(%err, "watch error"),
            }
        }
        if relevant > 0 {
            trace!(relevant, "content change pending");
            self.debouncer.notify((), now_ms);
        }
        self.debouncer.take_ready(now_ms).is_some()
    }

    /// When a pending change will be reported.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.debouncer.deadline_ms()
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, EventAttributes, ModifyKind};
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn event(kind: EventKind, path: PathBuf) -> Event {
        Event {
            kind,
            paths: vec![path],
            attrs: EventAttributes::new(),
        }
    }

    #[test]
    fn test_directory_level_event_is_relevant() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("portfolio.json5");
        std::fs::write(&path, "{}").expect("write");
        let watcher = ContentWatcher::new(&path, 10).expect("watcher");

        assert!(watcher.is_relevant(&event(EventKind::Any, canonical_dir)));
    }

    #[test]
    fn test_sibling_files_and_reads_are_ignored() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("portfolio.json5");
        std::fs::write(&path, "{}").expect("write");
        let watcher = ContentWatcher::new(&path, 10).expect("watcher");

        let sibling = event(
            EventKind::Modify(ModifyKind::Any),
            canonical_dir.join("notes.txt"),
        );
        let read = event(EventKind::Access(AccessKind::Any), path.clone());
        let write = event(EventKind::Modify(ModifyKind::Any), path);

        assert!(!watcher.is_relevant(&sibling));
        assert!(!watcher.is_relevant(&read));
        assert!(watcher.is_relevant(&write));
    }

    #[test]
    fn test_watch_root_for_relative_file_is_dot() {
        let root = watch_root_for(Path::new("portfolio.json5"));
        assert_eq!(root, PathBuf::from("."));
    }

    #[test]
    fn test_no_change_without_events() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("portfolio.json5");
        std::fs::write(&path, "{}").expect("write");
        let mut watcher = ContentWatcher::new(&path, 10).expect("watcher");

        assert!(!watcher.take_change_ready(1_000));
        assert_eq!(watcher.deadline_ms(), None);
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("portfolio.json5");
        std::fs::write(&path, "{}").expect("write");

        let mut watcher = ContentWatcher::new(&path, 50).expect("watcher");
        std::thread::sleep(Duration::from_millis(500));
        std::fs::write(&path, "{ owner: 'x' }").expect("write");

        let start = Instant::now();
        let mut detected = false;
        while start.elapsed() < Duration::from_secs(5) {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if watcher.take_change_ready(now_ms) {
                detected = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        assert!(detected, "watcher should report the write within 5 seconds");
    }
}
