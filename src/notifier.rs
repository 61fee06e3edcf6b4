use crate::errors::IndexError;

/// Where user-facing errors go. Fire and forget: implementations must not
/// panic or block the indexer.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, title: &str, detail: &str);
}

/// Reports errors through the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, title: &str, detail: &str) {
        log::error!("{title}: {detail}");
    }
}

pub fn notify(notifier: &dyn Notifier, err: &IndexError) {
    notifier.notify_error(err.title(), &err.to_string());
}
