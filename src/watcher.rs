//! Filesystem watcher: turns raw notify events into debounced batches of
//! [`FileEvent`]s over the planning root.
//!
//! Events are collected until the tree has been quiet for the debounce
//! window, then flushed as one batch so a multi-file write (editor save,
//! git checkout) produces a single state transition.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::state::{FileEvent, FileEventKind};

const DEBOUNCE: Duration = Duration::from_millis(300);
const EVENT_CHANNEL_CAPACITY: usize = 1024;
const BATCH_CHANNEL_CAPACITY: usize = 64;

/// Watch the planning root recursively and deliver debounced event batches.
///
/// The returned watcher must stay alive for as long as batches are wanted;
/// dropping it stops the stream.
pub fn watch_planning_dir(
    planning_root: &Path,
) -> notify::Result<(RecommendedWatcher, mpsc::Receiver<Vec<FileEvent>>)> {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = event_tx.blocking_send(res);
        },
        NotifyConfig::default(),
    )?;
    watcher.watch(planning_root, RecursiveMode::Recursive)?;

    let (batch_tx, batch_rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
    tokio::spawn(debounce_loop(planning_root.to_path_buf(), event_rx, batch_tx));

    Ok((watcher, batch_rx))
}

async fn debounce_loop(
    planning_root: PathBuf,
    mut event_rx: mpsc::Receiver<notify::Result<Event>>,
    batch_tx: mpsc::Sender<Vec<FileEvent>>,
) {
    let mut pending: Vec<FileEvent> = Vec::new();
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            received = event_rx.recv() => {
                let Some(received) = received else {
                    break;
                };
                match received {
                    Ok(event) => {
                        for file_event in translate(&planning_root, &event) {
                            debug!(kind = ?file_event.kind, path = %file_event.path.display(), "fs event");
                            pending.push(file_event);
                            deadline = Some(Instant::now() + DEBOUNCE);
                        }
                    }
                    Err(err) => warn!("watcher error: {err}"),
                }
            }
            () = async {
                if let Some(at) = deadline {
                    time::sleep_until(at).await;
                }
            }, if deadline.is_some() => {
                deadline = None;
                let batch = std::mem::take(&mut pending);
                if !batch.is_empty() && batch_tx.send(batch).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Map one notify event to zero or more state-level file events, dropping
/// paths the planning model does not track.
fn translate(planning_root: &Path, event: &Event) -> Vec<FileEvent> {
    let kind = match &event.kind {
        EventKind::Create(CreateKind::File | CreateKind::Any) => FileEventKind::Add,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => FileEventKind::Unlink,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => FileEventKind::Add,
        EventKind::Modify(_) => FileEventKind::Change,
        EventKind::Remove(RemoveKind::File | RemoveKind::Any) => FileEventKind::Unlink,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .filter(|path| is_relevant(planning_root, path))
        .map(|path| FileEvent::new(kind, path.clone()))
        .collect()
}

/// Only markdown and JSON files inside the planning tree matter, and never
/// anything under a hidden directory or a dependency/build tree.
fn is_relevant(planning_root: &Path, path: &Path) -> bool {
    let tracked_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("json"));
    if !tracked_extension {
        return false;
    }

    let Ok(relative) = path.strip_prefix(planning_root) else {
        return false;
    };

    for component in relative.components() {
        if let std::path::Component::Normal(name) = component {
            let name = name.to_string_lossy();
            if name.starts_with('.') || name == "node_modules" || name == "target" {
                return false;
            }
        }
    }
    true
}
