//! File change notifications for the bookmark file.
//!
//! The watch is placed on the file's parent directory so that browsers
//! replacing the file by rename keep triggering events. Every relevant event
//! is posted as [`WatchEvent::Changed`] on the engine's channel.
//!
//! When the parent directory does not exist yet, its nearest existing
//! ancestor is watched instead and the watch moves down as the missing
//! directories appear.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    any::Any,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread::JoinHandle,
};

use crate::errors::IndexError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed,
    Shutdown,
}

pub trait ChangeSource: Send + Sync {
    fn subscribe(&self, path: &Path, tx: Sender<WatchEvent>) -> Result<Subscription, IndexError>;
}

/// A live subscription. Dropping it stops the notifications.
pub struct Subscription {
    _guard: Box<dyn Any + Send>,
}

impl Subscription {
    pub fn new<T: Send + 'static>(guard: T) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    pub fn cancel(self) {
        drop(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FsChangeSource;

impl ChangeSource for FsChangeSource {
    fn subscribe(&self, path: &Path, tx: Sender<WatchEvent>) -> Result<Subscription, IndexError> {
        let file_name = path.file_name().map(|name| name.to_os_string());
        let dir = watch_dir(path);

        if !dir.is_dir() {
            let pending = PendingWatch::start(dir, file_name, tx)?;
            return Ok(Subscription::new(pending));
        }

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if touches_file(&event, file_name.as_deref()) {
                        let _ = tx.send(WatchEvent::Changed);
                    }
                }
                Err(err) => log::error!("watch error: {err:?}"),
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        log::debug!("watching {} for changes", dir.display());
        Ok(Subscription::new(watcher))
    }
}

fn touches_file(event: &Event, file_name: Option<&OsStr>) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|changed| changed.file_name() == file_name)
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn existing_ancestor(dir: &Path) -> PathBuf {
    dir.ancestors()
        .find(|ancestor| !ancestor.as_os_str().is_empty() && ancestor.is_dir())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

enum Signal {
    Fs(Event),
    Rescan,
    Stop,
}

/// Watch on an ancestor of a directory that doesn't exist yet.
///
/// A worker thread owns the watcher so it can re-arm it outside of the
/// notify callback. Dropping the guard stops the worker.
struct PendingWatch {
    signals: Sender<Signal>,
    worker: Option<JoinHandle<()>>,
}

impl PendingWatch {
    fn start(
        dir: PathBuf,
        file_name: Option<OsString>,
        tx: Sender<WatchEvent>,
    ) -> Result<Self, IndexError> {
        let (signals, signal_rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            {
                let signals = signals.clone();
                move |res: notify::Result<Event>| match res {
                    Ok(event) => {
                        let _ = signals.send(Signal::Fs(event));
                    }
                    Err(err) => log::error!("watch error: {err:?}"),
                }
            },
            Config::default(),
        )?;

        let watched = existing_ancestor(&dir);
        watcher.watch(&watched, RecursiveMode::NonRecursive)?;
        log::debug!(
            "{} does not exist yet, watching {}",
            dir.display(),
            watched.display()
        );
        // catches directories created while the watcher was being set up
        let _ = signals.send(Signal::Rescan);

        let worker = std::thread::spawn(move || {
            run_pending(watcher, watched, dir, file_name, signal_rx, tx)
        });

        Ok(Self {
            signals,
            worker: Some(worker),
        })
    }
}

impl Drop for PendingWatch {
    fn drop(&mut self) {
        let _ = self.signals.send(Signal::Stop);
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.join() {
                log::error!("watch worker panicked: {err:?}");
            }
        }
    }
}

fn run_pending(
    mut watcher: RecommendedWatcher,
    mut watched: PathBuf,
    dir: PathBuf,
    file_name: Option<OsString>,
    signal_rx: Receiver<Signal>,
    tx: Sender<WatchEvent>,
) {
    while let Ok(signal) = signal_rx.recv() {
        let event = match signal {
            Signal::Fs(event) => Some(event),
            Signal::Rescan => None,
            Signal::Stop => return,
        };

        if watched != dir {
            // directories created before the watch moved produce no event
            loop {
                let deeper = existing_ancestor(&dir);
                if deeper == watched {
                    break;
                }
                if let Err(err) = watcher.watch(&deeper, RecursiveMode::NonRecursive) {
                    log::warn!("could not watch {}: {err:?}", deeper.display());
                    break;
                }
                let _ = watcher.unwatch(&watched);
                log::debug!("watching {} for changes", deeper.display());
                watched = deeper;
            }

            // the file may have landed before the watch moved
            if watched == dir && file_name.as_ref().is_some_and(|name| dir.join(name).exists()) {
                let _ = tx.send(WatchEvent::Changed);
            }
            continue;
        }

        if event.is_some_and(|event| touches_file(&event, file_name.as_deref())) {
            let _ = tx.send(WatchEvent::Changed);
        }
    }
}
