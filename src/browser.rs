// Browser wrapper: owns the engine handle and the deferred navigation queue.
// Hosts call into this; the engine only ever sees loads once it is ready.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BrowserError;
use crate::modules::deferred::{DeferredNavigationQueue, Submitted};
use crate::modules::navigation::NavigationRequest;
use crate::modules::readiness::{ready_channel, ReadyNotifier};
use crate::modules::sink::{Executor, NavigationSink, ScheduledSink};
use crate::settings::BrowserSettings;

/// Context menu command id for "Open DevTools". The last id reserved for
/// embedder commands, so it never clashes with engine-defined items.
pub const DEVTOOLS_COMMAND_ID: i32 = 28500;

/// An embedded engine handle.
pub trait BrowserEngine: NavigationSink + 'static {
    fn open_devtools(&self) -> Result<(), BrowserError>;

    /// Brings an already open DevTools window to the front.
    fn focus_devtools(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    fn stop_load(&self);
    fn close(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: i32,
    pub label: String,
}

/// Why the engine wants keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSource {
    Navigation,
    System,
}

pub struct Browser<E: BrowserEngine> {
    engine: Arc<E>,
    queue: DeferredNavigationQueue<ScheduledSink<E>>,
    settings: BrowserSettings,
    devtools_open: Mutex<bool>,
    disposed: AtomicBool,
}

impl<E: BrowserEngine> Browser<E> {
    fn build(
        engine: Arc<E>,
        queue: DeferredNavigationQueue<ScheduledSink<E>>,
        settings: BrowserSettings,
    ) -> Self {
        Self {
            engine,
            queue,
            settings,
            devtools_open: Mutex::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Wraps a handle that is still being constructed.
    ///
    /// Loads are held back until the returned notifier fires. The watcher runs
    /// on the current Tokio runtime and only keeps a weak reference, so
    /// dropping the browser first is fine.
    pub fn create(
        engine: Arc<E>,
        executor: Arc<dyn Executor>,
        settings: BrowserSettings,
    ) -> Result<(Arc<Self>, ReadyNotifier), BrowserError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| BrowserError::NoRuntime)?;

        let sink = ScheduledSink::new(engine.clone(), executor);
        let browser = Arc::new(Self::build(engine, DeferredNavigationQueue::new(sink), settings));

        // A blank initial_url in a settings file means "none".
        let initial_url = browser
            .settings
            .initial_url
            .clone()
            .filter(|url| !url.trim().is_empty());
        if let Some(url) = initial_url {
            browser.load_url(&url)?;
        }

        let (notifier, signal) = ready_channel();
        let watched = Arc::downgrade(&browser);
        runtime.spawn(async move {
            if let Err(e) = signal.wait().await {
                log::warn!("[Browser] {}", e);
                return;
            }
            let Some(browser) = watched.upgrade() else {
                log::debug!("[Browser] Ready signal arrived after the browser was dropped");
                return;
            };
            if let Err(e) = browser.on_engine_ready() {
                log::error!("[Browser] Failed to apply deferred navigation: {}", e);
            }
        });

        Ok((browser, notifier))
    }

    /// Wraps a handle that already exists. Loads go straight through and
    /// `initial_url` is not applied, the handle has its own page.
    pub fn adopt(engine: Arc<E>, executor: Arc<dyn Executor>, settings: BrowserSettings) -> Arc<Self> {
        let sink = ScheduledSink::new(engine.clone(), executor);
        Arc::new(Self::build(engine, DeferredNavigationQueue::new_ready(sink), settings))
    }

    /// Call from the engine's "handle created" callback when it is a plain call.
    /// After `dispose` this does nothing.
    pub fn on_engine_ready(&self) -> Result<bool, BrowserError> {
        self.queue.mark_ready()
    }

    pub fn load_url(&self, url: &str) -> Result<Submitted, BrowserError> {
        self.ensure_live()?;
        self.queue.submit(NavigationRequest::url(url)?)
    }

    /// Loads HTML content. `base_url` may affect the restriction policy
    /// applied to the content.
    pub fn load_html(&self, html: &str, base_url: &str) -> Result<Submitted, BrowserError> {
        self.ensure_live()?;
        self.queue.submit(NavigationRequest::html(html, base_url)?)
    }

    pub fn load_html_blank(&self, html: &str) -> Result<Submitted, BrowserError> {
        self.load_html(html, &self.settings.blank_url)
    }

    pub fn context_menu_items(&self) -> Vec<MenuItem> {
        let mut items = Vec::new();
        if self.settings.devtools_menu {
            items.push(MenuItem {
                id: DEVTOOLS_COMMAND_ID,
                label: "Open DevTools".to_string(),
            });
        }
        items
    }

    /// Returns true if the command was handled here.
    pub fn on_context_menu_command(&self, command_id: i32) -> Result<bool, BrowserError> {
        if command_id != DEVTOOLS_COMMAND_ID {
            return Ok(false);
        }
        self.open_devtools()?;
        Ok(true)
    }

    pub fn open_devtools(&self) -> Result<(), BrowserError> {
        self.ensure_live()?;
        let mut open = self.devtools_open.lock();
        if *open {
            return self.engine.focus_devtools();
        }
        self.engine.open_devtools()?;
        *open = true;
        log::info!("[Browser] DevTools opened");
        Ok(())
    }

    /// Host callback for when the user closes the DevTools window.
    pub fn devtools_closed(&self) {
        *self.devtools_open.lock() = false;
    }

    pub fn is_devtools_open(&self) -> bool {
        *self.devtools_open.lock()
    }

    /// Navigation must not pull keyboard focus into the page.
    pub fn should_block_focus(&self, source: FocusSource) -> bool {
        source == FocusSource::Navigation
    }

    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        // Close the queue first so a late ready signal cannot load into a closed engine.
        self.queue.close();
        self.engine.stop_load();
        self.engine.close();
        log::info!("[Browser] Disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn is_ready(&self) -> bool {
        self.queue.is_ready()
    }

    pub fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    fn ensure_live(&self) -> Result<(), BrowserError> {
        if self.is_disposed() {
            return Err(BrowserError::Disposed);
        }
        Ok(())
    }
}
