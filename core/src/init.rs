//! One-time global initialization of the transfer engine.

use std::sync::Once;

static ENGINE_INIT: Once = Once::new();

/// Initialize libcurl's process-wide state exactly once.
///
/// Safe to call from any thread and on every execute; the `Once` gives the
/// uninitialized -> initialized transition a happens-before edge ahead of
/// the first transfer.
pub(crate) fn ensure_initialized() {
    ENGINE_INIT.call_once(|| {
        curl::init();
        tracing::debug!("transfer engine initialized");
    });
}
