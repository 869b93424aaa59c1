// The boundary to the browser engine, plus the hand-off onto the thread it
// insists on for loads.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::BrowserError;

/// Performs the actual page load. Implemented by engine adapters.
pub trait NavigationSink: Send + Sync {
    fn apply_url(&self, target: &str) -> Result<(), BrowserError>;
    fn apply_html(&self, body: &str, base_url: &str) -> Result<(), BrowserError>;
}

impl<S: NavigationSink + ?Sized> NavigationSink for Arc<S> {
    fn apply_url(&self, target: &str) -> Result<(), BrowserError> {
        (**self).apply_url(target)
    }

    fn apply_html(&self, body: &str, base_url: &str) -> Result<(), BrowserError> {
        (**self).apply_html(body, base_url)
    }
}

impl<S: NavigationSink + ?Sized> NavigationSink for &S {
    fn apply_url(&self, target: &str) -> Result<(), BrowserError> {
        (**self).apply_url(target)
    }

    fn apply_html(&self, body: &str, base_url: &str) -> Result<(), BrowserError> {
        (**self).apply_html(body, base_url)
    }
}

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Schedules work on the execution context the engine requires.
/// Must not block the caller.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task) -> Result<(), BrowserError>;
}

/// Runs tasks on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) -> Result<(), BrowserError> {
        task();
        Ok(())
    }
}

/// Sending half of a [`UiLoop`].
#[derive(Clone)]
pub struct UiLoopHandle {
    tx: mpsc::UnboundedSender<Task>,
}

impl Executor for UiLoopHandle {
    fn execute(&self, task: Task) -> Result<(), BrowserError> {
        self.tx.send(task).map_err(|_| BrowserError::DispatchClosed)
    }
}

/// A single-consumer task loop standing in for a UI thread.
pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl UiLoop {
    pub fn new() -> (UiLoopHandle, UiLoop) {
        let (tx, rx) = mpsc::unbounded_channel();
        (UiLoopHandle { tx }, UiLoop { rx })
    }

    /// Runs every task queued so far and returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Runs tasks until every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            task();
        }
        log::debug!("[UiLoop] All handles dropped, loop finished");
    }
}

/// Sink that forwards each load to an inner sink through an [`Executor`].
///
/// Only scheduling failures reach the caller. An engine failure inside the
/// scheduled task is logged, since the caller has already returned by then.
pub struct ScheduledSink<S: ?Sized> {
    inner: Arc<S>,
    executor: Arc<dyn Executor>,
}

impl<S: ?Sized> Clone for ScheduledSink<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl<S: NavigationSink + ?Sized + 'static> ScheduledSink<S> {
    pub fn new(inner: Arc<S>, executor: Arc<dyn Executor>) -> Self {
        Self { inner, executor }
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

impl<S: NavigationSink + ?Sized + 'static> NavigationSink for ScheduledSink<S> {
    fn apply_url(&self, target: &str) -> Result<(), BrowserError> {
        let inner = self.inner.clone();
        let target = target.to_string();
        self.executor.execute(Box::new(move || {
            if let Err(e) = inner.apply_url(&target) {
                log::error!("[Navigation] Failed to load {}: {}", target, e);
            }
        }))
    }

    fn apply_html(&self, body: &str, base_url: &str) -> Result<(), BrowserError> {
        let inner = self.inner.clone();
        let body = body.to_string();
        let base_url = base_url.to_string();
        self.executor.execute(Box::new(move || {
            if let Err(e) = inner.apply_html(&body, &base_url) {
                log::error!("[Navigation] Failed to load html with base {}: {}", base_url, e);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support::{Applied, RecordingSink};

    #[test]
    fn test_inline_executor_applies_now() {
        let inner = Arc::new(RecordingSink::default());
        let sink = ScheduledSink::new(inner.clone(), Arc::new(InlineExecutor));

        sink.apply_url("https://example.com").unwrap();

        assert_eq!(inner.applied(), vec![Applied::Url("https://example.com".to_string())]);
    }

    #[test]
    fn test_ui_loop_defers_until_drained() {
        let (handle, mut ui) = UiLoop::new();
        let inner = Arc::new(RecordingSink::default());
        let sink = ScheduledSink::new(inner.clone(), Arc::new(handle));

        sink.apply_html("<b>hi</b>", "about:blank").unwrap();
        sink.apply_url("https://x").unwrap();
        assert!(inner.applied().is_empty());

        assert_eq!(ui.run_pending(), 2);
        assert_eq!(
            inner.applied(),
            vec![
                Applied::Html("<b>hi</b>".to_string(), "about:blank".to_string()),
                Applied::Url("https://x".to_string()),
            ]
        );
        assert_eq!(ui.run_pending(), 0);
    }

    #[test]
    fn test_closed_loop_reports_dispatch_error() {
        let (handle, ui) = UiLoop::new();
        drop(ui);
        let sink = ScheduledSink::new(Arc::new(RecordingSink::default()), Arc::new(handle));

        assert!(matches!(sink.apply_url("https://x"), Err(BrowserError::DispatchClosed)));
    }

    #[test]
    fn test_engine_error_inside_task_is_not_returned() {
        let inner = Arc::new(RecordingSink::failing());
        let sink = ScheduledSink::new(inner.clone(), Arc::new(InlineExecutor));

        assert!(sink.apply_url("https://x").is_ok());
        assert_eq!(inner.attempts(), 1);
    }

    #[tokio::test]
    async fn test_ui_loop_run_finishes_when_handles_drop() {
        let (handle, ui) = UiLoop::new();
        let inner = Arc::new(RecordingSink::default());
        let sink = ScheduledSink::new(inner.clone(), Arc::new(handle));
        sink.apply_url("https://y").unwrap();
        drop(sink);

        ui.run().await;

        assert_eq!(inner.applied(), vec![Applied::Url("https://y".to_string())]);
    }
}
