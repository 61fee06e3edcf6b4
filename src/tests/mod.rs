mod search;

use std::{
    path::{Path, PathBuf},
    sync::{mpsc::Sender, Arc, Mutex},
    time::{Duration, Instant},
};

use crate::{
    errors::IndexError,
    launcher::Launcher,
    notifier::Notifier,
    watcher::{ChangeSource, Subscription, WatchEvent},
};

/// A backup shaped like the browser's: menu, toolbar, tags and unfiled roots.
pub const SAMPLE_BACKUP: &str = r#"{
  "guid": "root________",
  "title": "",
  "type": "text/x-moz-place-container",
  "root": "placesRoot",
  "children": [
    {
      "guid": "menu________",
      "title": "menu",
      "type": "text/x-moz-place-container",
      "root": "bookmarksMenuFolder",
      "children": [
        { "title": "Rust", "type": "text/x-moz-place", "uri": "https://www.rust-lang.org/" },
        {
          "title": "Docs",
          "type": "text/x-moz-place-container",
          "children": [
            { "title": "The Book", "type": "text/x-moz-place", "uri": "https://doc.rust-lang.org/book/" },
            { "type": "text/x-moz-place-separator" },
            {
              "title": "Nested",
              "type": "text/x-moz-place-container",
              "children": [
                { "title": "Cargo Guide", "type": "text/x-moz-place", "uri": "https://doc.rust-lang.org/cargo/" }
              ]
            }
          ]
        }
      ]
    },
    {
      "guid": "toolbar_____",
      "title": "toolbar",
      "type": "text/x-moz-place-container",
      "root": "toolbarFolder",
      "children": [
        { "title": "GitHub", "type": "text/x-moz-place", "uri": "https://github.com" },
        { "type": "text/x-moz-place", "uri": "https://untitled.example.com" }
      ]
    },
    {
      "guid": "tags________",
      "title": "tags",
      "type": "text/x-moz-place-container",
      "root": "tagsFolder",
      "children": [
        {
          "title": "rust",
          "type": "text/x-moz-place-container",
          "children": [
            { "title": "Tagged Only", "type": "text/x-moz-place", "uri": "https://tagged.example.com" }
          ]
        }
      ]
    },
    {
      "guid": "unfiled_____",
      "title": "unfiled",
      "type": "text/x-moz-place-container",
      "root": "unfiledBookmarksFolder",
      "children": [
        { "title": "Gitea Docs", "type": "text/x-moz-place", "uri": "https://gitea.io/docs" }
      ]
    }
  ]
}"#;

/// Collects notifications instead of showing them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub errors: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, title: &str, detail: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), detail.to_string()));
    }
}

/// A change source driven by the test: `trigger` posts a change event.
#[derive(Default, Clone)]
pub struct ManualChanges {
    senders: Arc<Mutex<Vec<Sender<WatchEvent>>>>,
    pub subscribed: Arc<Mutex<Vec<PathBuf>>>,
}

impl ManualChanges {
    pub fn trigger(&self) {
        for tx in self.senders.lock().unwrap().iter() {
            let _ = tx.send(WatchEvent::Changed);
        }
    }
}

impl ChangeSource for ManualChanges {
    fn subscribe(&self, path: &Path, tx: Sender<WatchEvent>) -> Result<Subscription, IndexError> {
        self.subscribed.lock().unwrap().push(path.to_path_buf());
        self.senders.lock().unwrap().push(tx);
        Ok(Subscription::new(()))
    }
}

#[derive(Default, Clone)]
pub struct RecordingLauncher {
    pub opened: Arc<Mutex<Vec<String>>>,
}

impl Launcher for RecordingLauncher {
    fn launch(&self, url: &str) -> anyhow::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Polls `check` until it holds or a few seconds pass.
pub fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    check()
}

pub fn write_backup(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}
