// Navigation requests - no engine imports allowed.
// A request is built and validated here, then handed to whatever sink is current.

use url::Url;

use crate::error::BrowserError;
use crate::modules::sink::NavigationSink;

/// Page used as the base URL for raw HTML when the caller gives none.
pub const BLANK_URL: &str = "about:blank";

/// A single load instruction for a browser control.
///
/// Only [`url`](Self::url) and [`html`](Self::html) can build one, so every
/// request that reaches a sink has a non-empty target or body.
///
/// ```compile_fail
/// use deferred_browser_lib::NavigationRequest;
/// let _ = NavigationRequest::Url { target: String::new() };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest(Kind);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Url { target: String },
    Html { body: String, base_url: String },
}

impl NavigationRequest {
    /// Builds a URL load. The target is kept as given, only a blank one is rejected.
    pub fn url(target: impl Into<String>) -> Result<Self, BrowserError> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(BrowserError::EmptyTarget);
        }
        Ok(Self(Kind::Url { target }))
    }

    /// Builds a raw HTML load.
    ///
    /// `base_url` only affects the restriction policy applied to the content;
    /// an empty one falls back to [`BLANK_URL`].
    pub fn html(body: impl Into<String>, base_url: impl Into<String>) -> Result<Self, BrowserError> {
        let body = body.into();
        if body.is_empty() {
            return Err(BrowserError::EmptyBody);
        }
        let mut base_url = base_url.into();
        if base_url.trim().is_empty() {
            base_url = BLANK_URL.to_string();
        }
        Ok(Self(Kind::Html { body, base_url }))
    }

    /// The URL this request navigates to, or the base URL for HTML.
    pub fn location(&self) -> &str {
        match &self.0 {
            Kind::Url { target } => target,
            Kind::Html { base_url, .. } => base_url,
        }
    }

    /// The HTML content, for HTML loads.
    pub fn body(&self) -> Option<&str> {
        match &self.0 {
            Kind::Url { .. } => None,
            Kind::Html { body, .. } => Some(body),
        }
    }

    /// Calls exactly one sink operation for this request.
    pub fn apply_to<S: NavigationSink + ?Sized>(&self, sink: &S) -> Result<(), BrowserError> {
        match &self.0 {
            Kind::Url { target } => sink.apply_url(target),
            Kind::Html { body, base_url } => sink.apply_html(body, base_url),
        }
    }
}

/// Parses a load target as an absolute URL, for engines that take a typed URL.
pub fn parse_target(target: &str) -> Result<Url, BrowserError> {
    Url::parse(target).map_err(|source| BrowserError::InvalidUrl {
        target: target.to_string(),
        source,
    })
}
