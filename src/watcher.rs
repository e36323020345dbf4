// File watcher: turns notify events for one log file into change/remove notifications

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// File was created or written.
    Changed,
    /// File was deleted or moved away.
    Removed,
}

/// Maps a raw notify event to a watch event if it concerns `target`.
pub fn classify(event: &Event, target: &Path) -> Option<WatchEvent> {
    if !event.paths.iter().any(|p| p == target) {
        return None;
    }
    match event.kind {
        EventKind::Create(_) => Some(WatchEvent::Changed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(WatchEvent::Removed),
        EventKind::Modify(_) => Some(WatchEvent::Changed),
        EventKind::Remove(_) => Some(WatchEvent::Removed),
        _ => None,
    }
}

/// Absolute path of `path` with its parent directory resolved; the file itself may be missing.
pub fn resolve_target(path: &Path) -> anyhow::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("not a file path: {}", path.display()))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent = parent
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("watch directory {}: {}", parent.display(), e))?;
    Ok(parent.join(file_name))
}

/// Watches the directory containing `path` (non-recursive) and forwards events for `path`.
/// The returned watcher must be kept alive for events to keep flowing.
pub fn watch_file(
    path: &Path,
) -> anyhow::Result<(RecommendedWatcher, mpsc::UnboundedReceiver<WatchEvent>)> {
    let target = resolve_target(path)?;
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("no parent directory: {}", target.display()))?;
    let (tx, rx) = mpsc::unbounded_channel();

    let filter_target = target.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if let Some(ev) = classify(&event, &filter_target) {
                let _ = tx.send(ev);
            }
        }
        Err(e) => tracing::warn!(error = %e, "File watch error"),
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %target.display(), "Watching log file");
    Ok((watcher, rx))
}

/// Waits until no event arrived for `quiet` and returns the last event of the burst.
pub async fn settle(
    rx: &mut mpsc::UnboundedReceiver<WatchEvent>,
    first: WatchEvent,
    quiet: Duration,
) -> WatchEvent {
    let mut last = first;
    loop {
        match timeout(quiet, rx.recv()).await {
            Ok(Some(ev)) => last = ev,
            Ok(None) | Err(_) => return last,
        }
    }
}
