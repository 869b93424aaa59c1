// Deferred Browser Library Entry Point
// Wraps an embedded browser engine handle and holds navigation back until the
// handle has been constructed.

pub mod browser;
pub mod error;
pub mod settings;

// Pure logic modules (no Tauri imports)
pub mod modules;

// Tauri adapter
#[cfg(feature = "tauri-host")]
pub mod host;

pub use browser::{Browser, BrowserEngine, FocusSource, MenuItem, DEVTOOLS_COMMAND_ID};
pub use error::BrowserError;
pub use modules::deferred::{DeferredNavigationQueue, Submitted};
pub use modules::navigation::{NavigationRequest, BLANK_URL};
pub use modules::readiness::{ready_channel, ReadyNotifier, ReadySignal, SharedNotifier};
pub use modules::sink::{Executor, InlineExecutor, NavigationSink, ScheduledSink, Task, UiLoop, UiLoopHandle};
pub use settings::BrowserSettings;
