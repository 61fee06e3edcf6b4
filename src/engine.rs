use std::{
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, RwLock,
    },
    thread::JoinHandle,
    time::Instant,
};

use crate::{
    bookmarks::{self, Bookmark},
    errors::IndexError,
    notifier::{self, Notifier},
    search::{self, SearchResult},
    watcher::{ChangeSource, Subscription, WatchEvent},
};

/// The bookmark list shared between the engine and its reload worker.
struct IndexState {
    path: PathBuf,
    list: RwLock<Arc<Vec<Bookmark>>>,
    notifier: Arc<dyn Notifier>,
}

impl IndexState {
    fn snapshot(&self) -> Arc<Vec<Bookmark>> {
        match self.list.read() {
            Ok(list) => list.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // Readers hold either the old or the new list, the lock only guards the swap.
    fn reload(&self) -> Result<usize, IndexError> {
        let now = Instant::now();
        let bmarks = match bookmarks::read_index(&self.path) {
            Ok(bmarks) => bmarks,
            Err(err) => {
                notifier::notify(self.notifier.as_ref(), &err);
                return Err(err);
            }
        };

        let count = bmarks.len();
        let bmarks = Arc::new(bmarks);
        match self.list.write() {
            Ok(mut list) => *list = bmarks,
            Err(poisoned) => *poisoned.into_inner() = bmarks,
        }

        log::info!(
            "indexed {count} bookmarks from {} in {}ms",
            self.path.display(),
            now.elapsed().as_micros() as f64 / 1000.0
        );
        Ok(count)
    }
}

/// Owns the flat bookmark list for one file and keeps it in sync with disk.
///
/// A single worker thread drains change events and re-reads the whole file,
/// so reloads never overlap. A failed reload keeps the previous list.
pub struct IndexEngine {
    state: Arc<IndexState>,
    task_tx: Sender<WatchEvent>,
    subscription: Option<Subscription>,
    worker: Option<JoinHandle<()>>,
}

impl IndexEngine {
    /// Reads `path` once and subscribes to its changes.
    ///
    /// A failed first read is reported and leaves the index empty; the next
    /// change event retries. Only a failed subscription aborts the start.
    pub fn start(
        path: PathBuf,
        notifier: Arc<dyn Notifier>,
        changes: &dyn ChangeSource,
    ) -> Result<Self, IndexError> {
        let state = Arc::new(IndexState {
            path,
            list: RwLock::new(Arc::new(vec![])),
            notifier,
        });

        let _ = state.reload();

        let (task_tx, task_rx) = mpsc::channel::<WatchEvent>();
        let subscription = changes.subscribe(&state.path, task_tx.clone())?;

        let worker = std::thread::spawn({
            let state = state.clone();
            move || run_reloads(task_rx, state)
        });

        Ok(Self {
            state,
            task_tx,
            subscription: Some(subscription),
            worker: Some(worker),
        })
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn bookmarks(&self) -> Arc<Vec<Bookmark>> {
        self.state.snapshot()
    }

    pub fn query<S: AsRef<str>>(&self, terms: &[S]) -> Vec<SearchResult> {
        search::rank(&self.state.snapshot(), terms)
    }

    /// Re-reads the file now. The change worker calls the same routine.
    #[allow(dead_code)]
    pub fn reload(&self) -> Result<usize, IndexError> {
        self.state.reload()
    }

    /// Cancels the subscription and waits for the reload worker to stop.
    pub fn dispose(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }

        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.task_tx.send(WatchEvent::Shutdown);
        if let Err(err) = worker.join() {
            log::error!("reload worker panicked: {err:?}");
        }
        log::debug!("stopped watching {}", self.state.path.display());
    }
}

impl Drop for IndexEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_reloads(task_rx: Receiver<WatchEvent>, state: Arc<IndexState>) {
    while let Ok(event) = task_rx.recv() {
        if event == WatchEvent::Shutdown {
            return;
        }

        // a burst of writes becomes one reload
        for queued in task_rx.try_iter() {
            if queued == WatchEvent::Shutdown {
                return;
            }
        }

        let _span = tracing::debug_span!("reload", path = %state.path.display()).entered();
        log::debug!("bookmark file changed");
        let _ = state.reload();
    }
}
