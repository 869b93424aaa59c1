// Holds the one navigation request issued before the engine handle exists.
//
// Invariants:
// - before ready, at most one request is pending; a new one replaces it
// - the ready transition drains pending exactly once
// - after ready, every request goes straight to the sink
// - once closed, nothing reaches the sink again

use std::cell::RefCell;

use parking_lot::ReentrantMutex;

use crate::error::BrowserError;
use crate::modules::navigation::NavigationRequest;
use crate::modules::sink::NavigationSink;

/// What `submit` did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// Kept until the handle is ready. A later submit may still replace it.
    Buffered,
    /// Handed to the sink.
    Dispatched,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Option<NavigationRequest>,
    ready: bool,
    closed: bool,
}

pub struct DeferredNavigationQueue<S> {
    // Reentrant so a sink may submit again from inside a flush on the same thread.
    // The RefCell borrow is never held across a sink call.
    state: ReentrantMutex<RefCell<QueueState>>,
    sink: S,
}

impl<S: NavigationSink> DeferredNavigationQueue<S> {
    pub fn new(sink: S) -> Self {
        Self {
            state: ReentrantMutex::new(RefCell::new(QueueState::default())),
            sink,
        }
    }

    /// A queue for a handle that already exists.
    pub fn new_ready(sink: S) -> Self {
        Self {
            state: ReentrantMutex::new(RefCell::new(QueueState {
                pending: None,
                ready: true,
                closed: false,
            })),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn submit(&self, request: NavigationRequest) -> Result<Submitted, BrowserError> {
        let guard = self.state.lock();

        let (ready, closed) = {
            let state = guard.borrow();
            (state.ready, state.closed)
        };
        if closed {
            return Err(BrowserError::Disposed);
        }
        if ready {
            log::trace!("[Navigation] Dispatching {}", request.location());
            // Lock stays held so a concurrent submit cannot overtake this one.
            request.apply_to(&self.sink)?;
            return Ok(Submitted::Dispatched);
        }

        let location = request.location().to_string();
        if let Some(previous) = guard.borrow_mut().pending.replace(request) {
            log::debug!(
                "[Navigation] {} supersedes pending {}",
                location,
                previous.location()
            );
        } else {
            log::debug!("[Navigation] Deferring {} until the browser is ready", location);
        }
        Ok(Submitted::Buffered)
    }

    /// Marks the handle ready and flushes the pending request, if any.
    ///
    /// Returns whether a request was flushed. Calls after the first, and calls
    /// on a closed queue, are no-ops.
    /// If the sink fails, the request is still dropped from the queue.
    pub fn mark_ready(&self) -> Result<bool, BrowserError> {
        let guard = self.state.lock();

        let pending = {
            let mut state = guard.borrow_mut();
            if state.closed {
                log::debug!("[Navigation] Ready after close, ignoring");
                return Ok(false);
            }
            if state.ready {
                return Ok(false);
            }
            state.ready = true;
            state.pending.take()
        };

        match pending {
            Some(request) => {
                log::debug!("[Navigation] Browser ready, flushing {}", request.location());
                request.apply_to(&self.sink)?;
                Ok(true)
            }
            None => {
                log::debug!("[Navigation] Browser ready, nothing pending");
                Ok(false)
            }
        }
    }

    /// Drops any pending request and refuses all later submits.
    ///
    /// Takes the same lock as `submit`, so a submit racing with close either
    /// finishes first or fails with [`BrowserError::Disposed`].
    pub fn close(&self) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        state.closed = true;
        if let Some(dropped) = state.pending.take() {
            log::debug!("[Navigation] Closed, dropping pending {}", dropped.location());
        }
    }

    pub fn is_closed(&self) -> bool {
        let guard = self.state.lock();
        let closed = guard.borrow().closed;
        closed
    }

    pub fn is_ready(&self) -> bool {
        let guard = self.state.lock();
        let ready = guard.borrow().ready;
        ready
    }

    pub fn has_pending(&self) -> bool {
        let guard = self.state.lock();
        let pending = guard.borrow().pending.is_some();
        pending
    }
}
