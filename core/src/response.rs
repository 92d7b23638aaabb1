//! Response value returned by every `execute` call.
//!
//! # Design
//! Transport-level failures (the engine never produced an HTTP status) are
//! reported through reserved status codes below [`CLIENT_ERROR_MAX`]. Real
//! HTTP statuses start at 100, so the two ranges never overlap and the
//! `error` flag can be derived from the code alone. A 4xx/5xx from the
//! server is *not* an error here; interpreting application-level statuses
//! is the caller's job.

/// The engine handle could not be created.
pub const STATUS_ENGINE_INIT_FAILED: u16 = 1;

/// The blocking transfer itself failed (DNS, connect, TLS, timeout, ...).
pub const STATUS_TRANSFER_FAILED: u16 = 2;

/// Exclusive upper bound of the reserved transport-failure status range.
pub const CLIENT_ERROR_MAX: u16 = 100;

/// Outcome of one executed request.
///
/// Plain value, created once per `execute` call and never mutated
/// afterwards. On transport failure `error_string` carries the engine's
/// diagnostic and `text` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The request's URL, echoed back.
    pub url: String,
    /// Numeric HTTP status, or a reserved code below [`CLIENT_ERROR_MAX`].
    pub status_code: u16,
    /// True iff `status_code` falls in the reserved transport-failure range.
    pub error: bool,
    /// Human-readable diagnostic; empty unless the transfer itself failed.
    pub error_string: String,
    /// Response body; empty on failure.
    pub text: String,
}

impl Response {
    pub(crate) fn new(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code,
            error: status_code < CLIENT_ERROR_MAX,
            error_string: String::new(),
            text: String::new(),
        }
    }

    pub(crate) fn transfer_failed(url: impl Into<String>, diagnostic: String) -> Self {
        let mut response = Self::new(url, STATUS_TRANSFER_FAILED);
        response.error_string = diagnostic;
        response
    }
}
