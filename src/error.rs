use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("navigation target is empty")]
    EmptyTarget,

    #[error("html body is empty")]
    EmptyBody,

    /// The engine refused or failed a load.
    #[error("engine error: {0}")]
    Engine(String),

    #[error("invalid url {target}: {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("dispatch loop is closed")]
    DispatchClosed,

    #[error("readiness notifier dropped before the handle was ready")]
    NotifierDropped,

    #[error("no async runtime available to watch for readiness")]
    NoRuntime,

    #[error("browser is disposed")]
    Disposed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
