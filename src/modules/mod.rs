// Module exports for pure logic
pub mod navigation;          // Request type and validation
pub mod sink;                // Engine boundary + executor hand-off
pub mod deferred;            // Pre-ready buffering
pub mod readiness;           // One-shot "handle constructed" signal
pub mod script;              // HTML-via-eval for script-only engines

#[cfg(test)]
pub(crate) mod test_support;
