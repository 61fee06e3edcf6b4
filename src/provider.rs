use serde::Serialize;
use std::sync::Arc;

use crate::{
    engine::IndexEngine,
    errors::IndexError,
    launcher::Launcher,
    notifier::{self, Notifier},
    search::SearchResult,
    source::Source,
    watcher::ChangeSource,
};

const ICON_NAME: &str = "firefox";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Uninitialized,
    Active,
    Disposed,
}

enum EngineState {
    Uninitialized,
    Active(IndexEngine),
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: &'static str,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMeta {
    pub display_name: String,
    pub url: String,
}

impl ResultMeta {
    pub fn create_icon(&self, size: u32) -> Icon {
        Icon {
            name: ICON_NAME,
            size,
        }
    }
}

/// The host-facing side of the bookmark index: lifecycle, queries and
/// activation.
pub struct BookmarkProvider {
    source: Source,
    notifier: Arc<dyn Notifier>,
    changes: Box<dyn ChangeSource>,
    launcher: Box<dyn Launcher>,
    state: EngineState,
}

impl BookmarkProvider {
    pub fn new(
        source: Source,
        notifier: Arc<dyn Notifier>,
        changes: Box<dyn ChangeSource>,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        Self {
            source,
            notifier,
            changes,
            launcher,
            state: EngineState::Uninitialized,
        }
    }

    pub fn status(&self) -> Status {
        match self.state {
            EngineState::Uninitialized => Status::Uninitialized,
            EngineState::Active(_) => Status::Active,
            EngineState::Disposed => Status::Disposed,
        }
    }

    pub fn engine(&self) -> Option<&IndexEngine> {
        match &self.state {
            EngineState::Active(engine) => Some(engine),
            _ => None,
        }
    }

    /// Resolves the bookmark file and starts indexing it. Failures are
    /// reported to the notifier and leave the provider inactive.
    pub fn enable(&mut self) -> Result<(), IndexError> {
        if let EngineState::Active(_) = self.state {
            return Ok(());
        }

        let started = self.source.resolve().and_then(|path| {
            log::info!("using bookmark file {}", path.display());
            IndexEngine::start(path, self.notifier.clone(), self.changes.as_ref())
        });

        match started {
            Ok(engine) => {
                self.state = EngineState::Active(engine);
                Ok(())
            }
            Err(err) => {
                notifier::notify(self.notifier.as_ref(), &err);
                Err(err)
            }
        }
    }

    pub fn disable(&mut self) {
        if let EngineState::Active(engine) =
            std::mem::replace(&mut self.state, EngineState::Disposed)
        {
            engine.dispose();
        }
    }

    pub fn initial_results<S: AsRef<str>>(
        &self,
        terms: &[S],
    ) -> Result<Vec<SearchResult>, IndexError> {
        let engine = self.engine().ok_or(IndexError::NotInitialized)?;
        Ok(engine.query(terms))
    }

    /// Refines a search. The full index is ranked again, `_previous` is not reused.
    pub fn subsearch_results<S: AsRef<str>>(
        &self,
        _previous: &[SearchResult],
        terms: &[S],
    ) -> Result<Vec<SearchResult>, IndexError> {
        self.initial_results(terms)
    }

    pub fn result_metadata(&self, result: &SearchResult) -> ResultMeta {
        let display_name = if result.title.trim().is_empty() {
            result.url.clone()
        } else {
            result.title.clone()
        };

        ResultMeta {
            display_name,
            url: result.url.clone(),
        }
    }

    pub fn activate(&self, result: &SearchResult) -> anyhow::Result<()> {
        self.launcher.launch(&result.url)
    }
}

impl Drop for BookmarkProvider {
    fn drop(&mut self) {
        self.disable();
    }
}
