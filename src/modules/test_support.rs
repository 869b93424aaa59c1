use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::BrowserError;
use crate::modules::sink::NavigationSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Url(String),
    Html(String, String),
}

/// Sink that records every load it is asked to perform.
#[derive(Default)]
pub struct RecordingSink {
    applied: Mutex<Vec<Applied>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn applied(&self) -> Vec<Applied> {
        self.applied.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn record(&self, applied: Applied) -> Result<(), BrowserError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BrowserError::Engine("load rejected".to_string()));
        }
        self.applied.lock().unwrap().push(applied);
        Ok(())
    }
}

impl NavigationSink for RecordingSink {
    fn apply_url(&self, target: &str) -> Result<(), BrowserError> {
        self.record(Applied::Url(target.to_string()))
    }

    fn apply_html(&self, body: &str, base_url: &str) -> Result<(), BrowserError> {
        self.record(Applied::Html(body.to_string(), base_url.to_string()))
    }
}
