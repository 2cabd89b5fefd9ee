//! Payload file watcher for hot reload.
//!
//! # Design Decisions
//! - The parent directory is watched, not the file. Editors and atomic
//!   writers replace the payload by renaming a new file over it, which
//!   retires the inode a file-level watch is attached to
//! - Events are filtered on the payload's file name; siblings such as the
//!   writer's temp file are ignored

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_payload;
use crate::config::schema::RoutingConfig;
use crate::observability::metrics;

/// A watcher that re-hydrates the payload file whenever it changes.
pub struct ConfigWatcher {
    path: PathBuf,
    poll_interval: Duration,
    update_tx: mpsc::UnboundedSender<RoutingConfig>,
}

/// Directory to watch for `path`; a bare file name lives in the current one.
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// True if `event` may have changed the contents behind `file_name`.
fn touches_payload(event: &Event, file_name: &OsString) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for hydrated snapshots.
    pub fn new(path: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<RoutingConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                poll_interval,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for updates to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| notify::Error::generic("payload path has no file name"))?;
        let dir = watch_dir(&self.path);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !touches_payload(&event, &file_name) {
                        return;
                    }
                    tracing::info!(path = ?path, kind = ?event.kind, "Payload change detected, reloading");
                    match load_payload(&path) {
                        Ok(config) => {
                            metrics::record_reload(true);
                            let _ = tx.send(config);
                        }
                        Err(e) => {
                            metrics::record_reload(false);
                            tracing::error!(error = %e, "Failed to reload payload, keeping current configuration");
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Payload watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("/etc/proxy/payload.json")), PathBuf::from("/etc/proxy"));
        assert_eq!(watch_dir(Path::new("payload.json")), PathBuf::from("."));
    }

    #[test]
    fn test_rename_over_payload_is_relevant() {
        let name = OsString::from("payload.json");
        let rename = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/d/payload.tmp", "/d/payload.json"],
        );
        assert!(touches_payload(&rename, &name));
        let moved_in = event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), &["/d/payload.json"]);
        assert!(touches_payload(&moved_in, &name));
        let created = event(EventKind::Create(CreateKind::File), &["/d/payload.json"]);
        assert!(touches_payload(&created, &name));
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let name = OsString::from("payload.json");
        let sibling = event(EventKind::Create(CreateKind::File), &["/d/payload.tmp"]);
        assert!(!touches_payload(&sibling, &name));
        let removed = event(EventKind::Remove(RemoveKind::File), &["/d/payload.json"]);
        assert!(!touches_payload(&removed, &name));
    }
}
