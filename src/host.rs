// Tauri adapter. The only file that imports Tauri; everything it drives is
// the pure logic under `modules/` and `browser.rs`.

use std::sync::{Arc, OnceLock};

use tauri::plugin::TauriPlugin;
use tauri::webview::{PageLoadEvent, WebviewBuilder};
use tauri::{AppHandle, Runtime, Webview};

use crate::browser::{Browser, BrowserEngine};
use crate::error::BrowserError;
use crate::modules::navigation::parse_target;
use crate::modules::readiness::{ReadyNotifier, SharedNotifier};
use crate::modules::script::document_write_script;
use crate::modules::sink::{Executor, NavigationSink, Task};
use crate::settings::BrowserSettings;

/// Logging for the host process, as the app sets it up in debug builds.
pub fn log_plugin<R: Runtime>() -> TauriPlugin<R> {
    tauri_plugin_log::Builder::default()
        .level(log::LevelFilter::Info)
        .build()
}

/// Runs tasks on the Tauri main thread, where webview loads must happen.
pub struct MainThreadExecutor<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> MainThreadExecutor<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> Executor for MainThreadExecutor<R> {
    fn execute(&self, task: Task) -> Result<(), BrowserError> {
        self.app
            .run_on_main_thread(task)
            .map_err(|_| BrowserError::DispatchClosed)
    }
}

/// A Tauri child webview. It can be created unbound and bound once
/// `add_child` has returned the webview.
pub struct TauriWebviewEngine<R: Runtime> {
    webview: OnceLock<Webview<R>>,
}

impl<R: Runtime> TauriWebviewEngine<R> {
    pub fn unbound() -> Self {
        Self { webview: OnceLock::new() }
    }

    pub fn bound(webview: Webview<R>) -> Self {
        let engine = Self::unbound();
        let _ = engine.webview.set(webview);
        engine
    }

    /// Binds the webview. A second bind is ignored.
    pub fn bind(&self, webview: Webview<R>) {
        if self.webview.set(webview).is_err() {
            log::warn!("[Host] Webview already bound, ignoring");
        }
    }

    fn webview(&self) -> Result<&Webview<R>, BrowserError> {
        self.webview
            .get()
            .ok_or_else(|| BrowserError::Engine("webview not bound".to_string()))
    }
}

impl<R: Runtime> NavigationSink for TauriWebviewEngine<R> {
    fn apply_url(&self, target: &str) -> Result<(), BrowserError> {
        let url = parse_target(target)?;
        self.webview()?
            .navigate(url)
            .map_err(|e| BrowserError::Engine(e.to_string()))
    }

    fn apply_html(&self, body: &str, base_url: &str) -> Result<(), BrowserError> {
        let script = document_write_script(body, base_url)?;
        self.webview()?
            .eval(script.as_str())
            .map_err(|e| BrowserError::Engine(e.to_string()))
    }
}

impl<R: Runtime> BrowserEngine for TauriWebviewEngine<R> {
    fn open_devtools(&self) -> Result<(), BrowserError> {
        self.webview()?.open_devtools();
        Ok(())
    }

    fn focus_devtools(&self) -> Result<(), BrowserError> {
        // Opening again raises the existing inspector.
        self.webview()?.open_devtools();
        Ok(())
    }

    fn stop_load(&self) {
        if let Ok(webview) = self.webview() {
            if let Err(e) = webview.eval("window.stop()") {
                log::warn!("[Host] Failed to stop loading: {}", e);
            }
        }
    }

    fn close(&self) {
        if let Ok(webview) = self.webview() {
            if let Err(e) = webview.close() {
                log::warn!("[Host] Failed to close webview: {}", e);
            }
        }
    }
}

/// Wraps an existing webview.
pub fn attach<R: Runtime>(
    app: &AppHandle<R>,
    webview: Webview<R>,
    settings: BrowserSettings,
) -> Arc<Browser<TauriWebviewEngine<R>>> {
    Browser::adopt(
        Arc::new(TauriWebviewEngine::bound(webview)),
        Arc::new(MainThreadExecutor::new(app.clone())),
        settings,
    )
}

/// Fires `notifier` when the webview finishes its first page load.
pub fn notify_on_first_load<R: Runtime>(
    builder: WebviewBuilder<R>,
    notifier: ReadyNotifier,
) -> WebviewBuilder<R> {
    let notifier = SharedNotifier::new(notifier);
    builder.on_page_load(move |_webview, payload| {
        if !matches!(payload.event(), PageLoadEvent::Finished) {
            return;
        }
        if notifier.notify() {
            log::debug!("[Host] First page load finished, webview ready");
        }
    })
}
